//! Tracing support.
//!
//! Every API call runs inside a [`RequestSpan`]. The crate never installs a
//! subscriber on its own; enable the `subscriber` feature and call
//! [`init_tracing`] for a ready-made fmt subscriber:
//!
//! ```toml
//! trailroom-sdk = { version = "0.1", features = ["subscriber"] }
//! ```
//!
//! ```rust,ignore
//! trailroom_sdk::observability::init_tracing("trailroom_sdk=debug")?;
//! ```

mod spans;

pub use spans::RequestSpan;

/// Installs a global fmt subscriber. `RUST_LOG` wins over `filter` when set.
#[cfg(feature = "subscriber")]
#[cfg_attr(docsrs, doc(cfg(feature = "subscriber")))]
pub fn init_tracing(filter: &str) -> crate::Result<()> {
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| crate::Error::Config(format!("invalid log filter {filter}: {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| crate::Error::Config(e.to_string()))
}
