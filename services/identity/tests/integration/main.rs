mod helpers;

mod login_test;
mod passwordless_test;
mod router_test;
mod session_test;
