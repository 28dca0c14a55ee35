// server/src/web/mod.rs

// Declare child modules
pub mod handlers;
pub mod routes;

#[cfg(test)]
pub mod test_support;

pub use routes::configure_app_routes;
