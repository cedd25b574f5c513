mod login_test;
mod middleware_test;
mod reset_test;
mod signup_test;
