//! Full scans of the save root.
//!
//! A scan walks every occupied slot and, per save, loads the fill type
//! mapping, totals `items.xml` and reports each total. Saves fail
//! independently: a corrupt save is logged and the scan moves on.

use crate::discovery::discover;
use crate::fill_type::FillTypeMap;
use crate::report::{emit, records, EmitSummary, Resource, Transport};
use crate::save::{Save, SaveError};
use crate::storage::aggregate;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub saves: usize,
    pub failed_saves: usize,
    pub delivered: usize,
    pub failed_deliveries: usize,
}

/// Compute the resource records of one save without delivering them
pub fn inspect(save: &Save) -> Result<Vec<Resource>, SaveError> {
    let mut map = FillTypeMap::load(&save.folder)?;
    let totals = aggregate(&save.folder, &mut map)?;
    Ok(records(&save.identity, &totals, &map)?)
}

/// Scans a save root and reports through a transport, one scan at a time
pub struct Scanner<T> {
    root: PathBuf,
    transport: T,
    guard: Mutex<()>,
}

impl<T: Transport> Scanner<T> {
    pub fn new(root: impl Into<PathBuf>, transport: T) -> Self {
        Scanner {
            root: root.into(),
            transport,
            guard: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one full scan
    ///
    /// Blocks while another scan on this scanner is in progress, so two
    /// scans never read the save files at the same time.
    pub fn scan(&self) -> ScanReport {
        // A scan that panicked holds no state worth protecting
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);

        tracing::info!("Syncing save files: {}", self.root.display());
        let mut report = ScanReport::default();

        for slot in discover(&self.root) {
            report.saves += 1;

            match slot.load().and_then(|save| self.process(&save)) {
                Ok(summary) => {
                    report.delivered += summary.delivered;
                    report.failed_deliveries += summary.failed;
                }
                Err(e) => {
                    tracing::error!("Failed to process save {}: {}", slot.path().display(), e);
                    report.failed_saves += 1;
                }
            }
        }

        tracing::info!(
            saves = report.saves,
            failed_saves = report.failed_saves,
            delivered = report.delivered,
            failed_deliveries = report.failed_deliveries,
            "Scan complete"
        );
        report
    }

    /// Aggregate one save and deliver its records
    pub fn process(&self, save: &Save) -> Result<EmitSummary, SaveError> {
        tracing::info!("Found save: {} with id: {}", save.name, save.identity);
        let resources = inspect(save)?;
        Ok(emit(&resources, &self.transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill_type::MAPPING_FILE;
    use crate::report::DeliveryError;
    use crate::save::DESCRIPTOR_FILE;
    use crate::storage::ITEMS_FILE;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<Resource>>,
        fail_type: Option<&'static str>,
    }

    impl Recorder {
        fn sorted(&self) -> Vec<(String, String, f64)> {
            let mut sent: Vec<_> = self
                .sent
                .lock()
                .unwrap()
                .iter()
                .map(|r| (r.location.to_string(), r.kind.clone(), r.amount))
                .collect();
            sent.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
            sent
        }
    }

    impl Transport for Recorder {
        fn deliver(&self, resource: &Resource) -> Result<(), DeliveryError> {
            if self.fail_type == Some(resource.kind.as_str()) {
                return Err(DeliveryError::Unreachable("connection refused".to_string()));
            }
            self.sent.lock().unwrap().push(resource.clone());
            Ok(())
        }
    }

    fn write_save(slot: &Path, player: &str, map_id: &str, mapping: &str, items: &str) {
        fs::create_dir_all(slot).unwrap();
        fs::write(
            slot.join(DESCRIPTOR_FILE),
            format!(
                "<careerSavegame><settings><savegameName>Farm</savegameName><mapId>{}</mapId><playerName>{}</playerName></settings></careerSavegame>",
                map_id, player
            ),
        )
        .unwrap();
        fs::write(slot.join(MAPPING_FILE), mapping).unwrap();
        fs::write(slot.join(ITEMS_FILE), items).unwrap();
    }

    const MAPPING: &str = r#"<densityMapHeightTypes>
        <tipTypeMapping fillType="wheat" index="0"/>
        <tipTypeMapping fillType="water" index="1"/>
    </densityMapHeightTypes>"#;

    const ITEMS: &str = r#"<items>
        <item className="SiloPlaceable">
            <storage index="1"><node fillType="WHEAT" fillLevel="120.5"/></storage>
        </item>
        <item className="SellingStationPlaceable">
            <sellingStation>
                <stats fillType="MILK" received="30.0"/>
                <stats fillType="EGG" received="0"/>
            </sellingStation>
        </item>
        <item className="TreePlaceable"/>
    </items>"#;

    #[test]
    fn test_scan_reports_totals() {
        let dir = tempfile::tempdir().unwrap();
        write_save(&dir.path().join("savegame1"), "Alice", "FarmMap01", MAPPING, ITEMS);
        fs::create_dir_all(dir.path().join("savegame2")).unwrap();

        let scanner = Scanner::new(dir.path(), Recorder::default());
        let report = scanner.scan();

        assert_eq!(
            report,
            ScanReport {
                saves: 1,
                failed_saves: 0,
                delivered: 2,
                failed_deliveries: 0,
            }
        );
        assert_eq!(
            scanner.transport().sorted(),
            vec![
                ("Alice-FarmMap01".to_string(), "MILK".to_string(), 30.0),
                ("Alice-FarmMap01".to_string(), "WHEAT".to_string(), 120.5),
            ]
        );
    }

    #[test]
    fn test_rescan_does_not_carry_over() {
        let dir = tempfile::tempdir().unwrap();
        write_save(&dir.path().join("savegame1"), "Alice", "FarmMap01", MAPPING, ITEMS);

        let first = Scanner::new(dir.path(), Recorder::default());
        first.scan();
        first.scan();

        let sent = first.transport().sorted();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(sent[2], sent[3]);
    }

    #[test]
    fn test_missing_root_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(dir.path().join("missing"), Recorder::default());

        assert_eq!(scanner.scan(), ScanReport::default());
        assert!(scanner.transport().sorted().is_empty());
    }

    #[test]
    fn test_corrupt_save_does_not_stop_siblings() {
        let dir = tempfile::tempdir().unwrap();
        write_save(&dir.path().join("savegame1"), "Alice", "FarmMap01", MAPPING, ITEMS);
        write_save(
            &dir.path().join("savegame2"),
            "Bob",
            "MapUS",
            MAPPING,
            r#"<items><item className="SiloPlaceable"><storage><node fillType="WHEAT" fillLevel="n/a"/></storage></item></items>"#,
        );
        let broken = dir.path().join("savegame3");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(DESCRIPTOR_FILE), "<careerSavegame>").unwrap();

        let scanner = Scanner::new(dir.path(), Recorder::default());
        let report = scanner.scan();

        assert_eq!(report.saves, 3);
        assert_eq!(report.failed_saves, 2);
        assert_eq!(report.delivered, 2);
        assert!(scanner
            .transport()
            .sorted()
            .iter()
            .all(|(location, _, _)| location == "Alice-FarmMap01"));
    }

    #[test]
    fn test_delivery_failure_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        write_save(&dir.path().join("savegame1"), "Alice", "FarmMap01", MAPPING, ITEMS);
        write_save(&dir.path().join("savegame2"), "Bob", "MapUS", MAPPING, ITEMS);

        let transport = Recorder {
            fail_type: Some("WHEAT"),
            ..Default::default()
        };
        let scanner = Scanner::new(dir.path(), transport);
        let report = scanner.scan();

        assert_eq!(report.failed_saves, 0);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed_deliveries, 2);
    }

    #[test]
    fn test_inspect_assigns_selling_station_codes() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("savegame1");
        write_save(&folder, "Alice", "FarmMap01", MAPPING, ITEMS);

        let save = Save::load(&folder).unwrap();
        let mut resources = inspect(&save).unwrap();
        resources.sort_by(|a, b| a.kind.cmp(&b.kind));

        let kinds: Vec<_> = resources.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["MILK", "WHEAT"]);
    }

    struct Overlap {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Transport for Overlap {
        fn deliver(&self, _resource: &Resource) -> Result<(), DeliveryError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_concurrent_scans_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=3 {
            write_save(
                &dir.path().join(format!("savegame{}", i)),
                "Alice",
                &format!("Map{}", i),
                MAPPING,
                ITEMS,
            );
        }

        let scanner = Arc::new(Scanner::new(
            dir.path(),
            Overlap {
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            },
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scanner = Arc::clone(&scanner);
                thread::spawn(move || scanner.scan())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().delivered, 6);
        }
        assert_eq!(scanner.transport().peak.load(Ordering::SeqCst), 1);
    }
}
