//! # farmlink
//!
//! Farming Simulator save extraction library - fill type mapping, storage
//! totals and resource reports.
//!
//! This library provides functionality to:
//! - Discover occupied save slots and read their descriptors
//! - Resolve each save's fill type name to code mapping
//! - Total silo contents and selling station receipts per fill type
//! - Report the totals to a resource server through a [`Transport`]
//!
//! ## Example
//!
//! ```no_run
//! use farmlink::{DeliveryError, Resource, Scanner, Transport};
//!
//! struct Print;
//!
//! impl Transport for Print {
//!     fn deliver(&self, resource: &Resource) -> Result<(), DeliveryError> {
//!         println!("{}", serde_json::to_string(resource)?);
//!         Ok(())
//!     }
//! }
//!
//! let scanner = Scanner::new("/home/me/Documents/My Games/FarmingSimulator2019", Print);
//! let report = scanner.scan();
//! println!("{} saves, {} records", report.saves, report.delivered);
//! ```

pub mod discovery;
pub mod fill_type;
pub mod report;
pub mod save;
pub mod scan;
pub mod storage;
pub mod totals;
pub mod xml;

// Re-export commonly used items
#[doc(inline)]
pub use discovery::{discover, SaveSlot, SaveSlots};
#[doc(inline)]
pub use fill_type::{FillTypeCode, FillTypeMap, MappingError};
#[doc(inline)]
pub use report::{emit, records, DeliveryError, EmitSummary, Resource, Transport};
#[doc(inline)]
pub use save::{Save, SaveError, SaveIdentity};
#[doc(inline)]
pub use scan::{inspect, ScanReport, Scanner};
#[doc(inline)]
pub use storage::{accumulate, aggregate, ItemClass};
#[doc(inline)]
pub use totals::ResourceTotals;
#[doc(inline)]
pub use xml::{Element, XmlError};
