mod auth;
mod helpers;
mod users;
