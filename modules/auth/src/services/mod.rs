pub mod email_login;
