mod access_test;
mod helpers;
mod issue_test;
mod redeem_test;
