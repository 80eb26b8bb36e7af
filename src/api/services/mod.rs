pub mod health;
pub mod redirect;
pub mod urls;

pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use urls::{UrlApiService, url_routes};
