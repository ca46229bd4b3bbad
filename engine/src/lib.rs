//! # SdkBase Engine
//!
//! Base library for vendor-API client SDKs that mirror a remote catalog
//! locally and ingest it in bounded batches across many invocations.
//!
//! ## Design Principles
//!
//! - **Resumable**: progress lives in a checkpoint file, so independent
//!   invocations pick up where the last one stopped
//! - **Bounded**: one `collect()` call processes at most one batch
//! - **Flat files**: every store is a single JSON array on disk, no database
//! - **Injected vendor**: the remote API is a [`VendorGateway`] the engine is
//!   generic over
//!
//! ## Core Concepts
//!
//! ### Records and stores
//!
//! A [`Record`] is an untyped JSON object. A [`RecordStore`] maps one `.json`
//! path to an ordered sequence of records and supports exact-match search.
//!
//! ### Collector
//!
//! The [`Collector`] keeps three stores: the vendor list, the in-progress
//! checkpoint and the last completed collection. Each cycle moves through
//! these states:
//!
//! - list imported from the vendor (first use, or a missing/corrupt file)
//! - [`CollectionState::InProgress`] while `collect()` grows the checkpoint
//! - [`CollectionState::Complete`] once the checkpoint is copied into the
//!   collection (finalize)
//! - back to in progress when [`Collector::must_recollect`] sees the vendor
//!   list change; the checkpoint is cleared, the collection is kept
//!
//! ### Transport errors
//!
//! Gateways report failures as [`TransportError`]; the collector surfaces them
//! unchanged. [`RetryPolicy`] implements the bounded fixed-delay retry for
//! throttling and temporary unavailability.
//!
//! ## Quick Start
//!
//! ```rust
//! use sdkbase_engine::{
//!     record_from_value, Collector, CollectorConfig, FnGateway, Record, TransportError,
//! };
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//!
//! // 1. Describe the vendor
//! let gateway = FnGateway::new(
//!     || -> Result<Vec<Record>, TransportError> {
//!         Ok((0..450)
//!             .map(|i| record_from_value(json!({"id": i})).unwrap())
//!             .collect())
//!     },
//!     |item: &Record| -> Result<Record, TransportError> {
//!         let mut out = item.clone();
//!         out.insert("seen".into(), json!(true));
//!         Ok(out)
//!     },
//! );
//!
//! // 2. Open the collector; the list is imported on first use
//! let config = CollectorConfig::in_dir(dir.path(), "items");
//! let mut collector = Collector::open(&config, gateway)?;
//! assert_eq!(collector.left_calls_count(), 3);
//!
//! // 3. One call per invocation; here they simply run back to back
//! while collector.collect()? > 0 {}
//!
//! assert_eq!(collector.collection().len(), 450);
//! # Ok::<(), sdkbase_engine::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Everything is synchronous and single-threaded. Store paths are assumed to
//! have a single writer; two processes sharing paths race with last save wins.

pub mod collector;
pub mod config;
pub mod error;
pub mod gateway;
pub mod record;
pub mod store;
pub mod transport;

// Re-export main types at crate root
pub use collector::{CollectionProgress, CollectionState, Collector, BATCH_SIZE};
pub use config::{CollectorConfig, ConfigError};
pub use error::Error;
pub use gateway::{FnGateway, VendorGateway};
pub use record::{record_from_value, Record};
pub use store::{LoadOutcome, RecordStore, STORE_EXTENSION};
pub use transport::{RetryPolicy, TransportError};
