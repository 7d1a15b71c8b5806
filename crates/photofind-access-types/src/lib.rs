//! Access types shared at the Photofind HTTP edge.
//!
//! Provides the `access_code` cookie builders, the signed session codec, and
//! the `MaybeIdentity` extractor for upstream identity assertions.

pub mod cookie;
pub mod identity;
pub mod token;
