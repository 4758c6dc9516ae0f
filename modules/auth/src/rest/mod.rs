pub mod middleware;
mod routes;

pub use routes::router;
