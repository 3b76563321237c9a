// MyRent - tests/e2e_import.rs
//
// End-to-end tests for the import pipeline, the SQLite store, backup
// export and the dashboard.
//
// These tests exercise real files on disk, real CSV/xlsx/JSON parsing and
// a real SQLite database in a temporary directory. No mocks, no stubs.

use chrono::{TimeZone, Utc};
use myrent::app::catalogue;
use myrent::app::dashboard::AnalyticsAggregator;
use myrent::app::import::ImportPipeline;
use myrent::core::analytics::{InsightKind, RadarAxis};
use myrent::core::export;
use myrent::core::model::Status;
use myrent::core::source::SourceKind;
use myrent::core::store::PropertyStore;
use myrent::platform::sqlite::SqliteStore;
use myrent::util::constants::DEFAULT_MAX_IMPORT_FILE_SIZE;
use myrent::util::error::ImportError;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn open_store(dir: &Path) -> SqliteStore {
    SqliteStore::open(&dir.join("myrent.sqlite3")).unwrap()
}

fn import(store: &mut SqliteStore, path: &Path) -> Result<myrent::core::model::ImportSummary, ImportError> {
    ImportPipeline::new(store).import_file(path, DEFAULT_MAX_IMPORT_FILE_SIZE)
}

// =============================================================================
// Tabular import
// =============================================================================

/// The survey CSV has two title rows, one duplicated address and a blank
/// trailer row; two records should land with computed totals.
#[test]
fn e2e_csv_fixture_imports_two_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());

    let summary = import(&mut store, &fixture("pesquisa_imoveis.csv")).unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped_duplicates, 1);
    assert_eq!(
        summary.message(),
        "2 imóveis importados com sucesso! (1 ignorados por duplicidade)"
    );

    let all = store.scan_all().unwrap();
    assert_eq!(all.len(), 2);

    let house = &all[0];
    assert_eq!(house.title, "Casa em Lago Sul");
    assert_eq!(house.total_cost, 15000.0);
    assert_eq!(house.area, 450.0);
    assert_eq!(house.tags, vec!["Casa", "4 quartos", "3 banheiros", "Varanda"]);
    assert_eq!(house.listing_url, "https://imoveis.example/1");
    assert!(house.notes.contains("Contato: (61) 99999-0000"));

    let flat = &all[1];
    assert_eq!(flat.title, "Apartamento (Residencial Aurora) em Asa Norte");
    assert_eq!(flat.total_cost, 3100.0);
    assert_eq!(flat.rent_value, 2500.0);
    assert_eq!(flat.area, 68.0);
    assert!(flat.tags.contains(&"Elevador".to_string()));
    assert!(flat.tags.contains(&"Metrô".to_string()));
    assert!(!flat.tags.contains(&"Varanda".to_string()));

    for record in &all {
        assert_eq!(record.total_cost, record.rent_value + record.condo_fee + record.iptu);
        assert_eq!(record.status, Status::Interested);
    }
}

/// Re-importing the same file skips every address already stored.
#[test]
fn e2e_reimport_skips_existing_addresses() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());

    import(&mut store, &fixture("pesquisa_imoveis.csv")).unwrap();
    let again = import(&mut store, &fixture("pesquisa_imoveis.csv")).unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.skipped_duplicates, 3);
    assert_eq!(again.message(), "0 imóveis importados com sucesso! (3 ignorados por duplicidade)");
    assert_eq!(store.scan_all().unwrap().len(), 2);
}

/// A workbook written with a title row above the headers and numeric cells
/// goes through the calamine path.
#[test]
fn e2e_xlsx_import() {
    use rust_xlsxwriter::Workbook;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lista.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Levantamento de aluguéis").unwrap();
    let headers = ["Região Administrativa", "ENDEREÇO", "TIPO", "Área Total m²", "ALUGUEL", "CONDOMÍNIO", "IPTU"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(1, col as u16, *header).unwrap();
    }
    sheet.write_string(2, 0, "Taguatinga").unwrap();
    sheet.write_string(2, 1, "QNA 12 Casa 8").unwrap();
    sheet.write_string(2, 2, "Casa").unwrap();
    sheet.write_number(2, 3, 120.0).unwrap();
    sheet.write_number(2, 4, 1900.0).unwrap();
    sheet.write_number(2, 5, 0.0).unwrap();
    sheet.write_number(2, 6, 75.5).unwrap();
    workbook.save(&path).unwrap();

    let mut store = open_store(dir.path());
    let summary = import(&mut store, &path).unwrap();
    assert_eq!(summary.inserted, 1);

    let rec = &store.scan_all().unwrap()[0];
    assert_eq!(rec.title, "Casa em Taguatinga");
    assert_eq!(rec.area, 120.0);
    assert_eq!(rec.total_cost, 1975.5);
    assert_eq!(rec.notes, "Área: 120m²\nRegião: Taguatinga");
}

// =============================================================================
// Backup import and export
// =============================================================================

/// Backup timestamps survive import; ids and stored totals are ignored.
#[test]
fn e2e_backup_preserves_created_at() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());

    let summary = import(&mut store, &fixture("backup_2023.json")).unwrap();
    assert_eq!(summary.inserted, 2);

    let all = store.scan_all().unwrap();
    let kitnet = &all[0];
    assert_eq!(
        kitnet.created_at,
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(kitnet.total_cost, 1380.0);
    assert_eq!(kitnet.status, Status::Visited);
    assert_eq!(kitnet.lat, Some(-15.83));
    assert_ne!(kitnet.id, Some(7));

    let flat = &all[1];
    assert_eq!(flat.rent_value, 3200.0);
    assert_eq!(flat.total_cost, 4250.0);
    assert_eq!(flat.status, Status::Interested);
}

/// Export then import into an empty database restores the catalogue.
#[test]
fn e2e_export_then_reimport() {
    let source_dir = tempfile::tempdir().unwrap();
    let mut source = open_store(source_dir.path());
    import(&mut source, &fixture("pesquisa_imoveis.csv")).unwrap();
    import(&mut source, &fixture("backup_2023.json")).unwrap();
    let original = source.scan_all().unwrap();

    let backup_path = source_dir
        .path()
        .join(export::backup_file_name(chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    let file = fs::File::create(&backup_path).unwrap();
    assert_eq!(export::export_backup(&original, file).unwrap(), 4);

    let target_dir = tempfile::tempdir().unwrap();
    let mut target = open_store(target_dir.path());
    let summary = import(&mut target, &backup_path).unwrap();
    assert_eq!(summary.inserted, 4);

    let restored = target.scan_all().unwrap();
    for (before, after) in original.iter().zip(&restored) {
        assert_eq!(before.address, after.address);
        assert_eq!(before.total_cost, after.total_cost);
        assert_eq!(before.tags, after.tags);
        assert_eq!(before.status, after.status);
        assert_eq!(before.created_at, after.created_at);
    }
}

// =============================================================================
// Failure modes: nothing persisted
// =============================================================================

#[test]
fn e2e_failures_leave_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());

    let object_root = dir.path().join("objeto.json");
    fs::write(&object_root, r#"{"address": "Rua 1"}"#).unwrap();
    assert!(matches!(
        import(&mut store, &object_root),
        Err(ImportError::MalformedBackup)
    ));

    let header_only = dir.path().join("vazio.csv");
    fs::write(&header_only, "ENDEREÇO,ALUGUEL\n").unwrap();
    assert!(matches!(
        import(&mut store, &header_only),
        Err(ImportError::EmptyData)
    ));

    let text_file = dir.path().join("lista.txt");
    fs::write(&text_file, "ENDEREÇO,ALUGUEL\nRua 1,1000\n").unwrap();
    assert!(matches!(
        import(&mut store, &text_file),
        Err(ImportError::UnsupportedFormat { .. })
    ));

    let broken_sheet = dir.path().join("quebrado.xlsx");
    fs::write(&broken_sheet, b"PK not really a zip").unwrap();
    assert!(matches!(
        import(&mut store, &broken_sheet),
        Err(ImportError::Spreadsheet { .. })
    ));

    let big = dir.path().join("grande.csv");
    fs::write(&big, vec![b'x'; 4096]).unwrap();
    assert!(matches!(
        ImportPipeline::new(&mut store).import_file(&big, 1024),
        Err(ImportError::FileTooLarge { .. })
    ));

    assert!(store.scan_all().unwrap().is_empty());
}

#[test]
fn e2e_payload_kind_is_explicit() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let result = ImportPipeline::new(&mut store).run(b"ENDERE\xC3\x87O\nRua 1\n", SourceKind::Backup);
    assert!(matches!(result, Err(ImportError::InvalidJson { .. })));
    assert!(store.scan_all().unwrap().is_empty());
}

// =============================================================================
// Dashboard and catalogue over the real store
// =============================================================================

#[test]
fn e2e_dashboard_over_imported_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());
    import(&mut store, &fixture("pesquisa_imoveis.csv")).unwrap();
    import(&mut store, &fixture("backup_2023.json")).unwrap();

    let stats = AnalyticsAggregator::new(&store).compute().unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.visited_count, 1);
    assert_eq!(stats.region_counts.len(), 4);
    assert_eq!(stats.scatter.len(), 3);
    assert!(stats.insights.iter().all(|i| i.kind != InsightKind::Info));

    let rent = stats.radar.iter().find(|a| a.axis == RadarAxis::Rent).unwrap();
    let lago_sul = rent.values.iter().find(|v| v.region == "Lago Sul").unwrap();
    assert_eq!(lago_sul.normalized, 100.0);
    assert_eq!(lago_sul.raw, 12000.0);
    assert!(rent.values.iter().all(|v| v.normalized <= 100.0));
}

#[test]
fn e2e_catalogue_edit_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path());
    import(&mut store, &fixture("backup_2023.json")).unwrap();

    let mut kitnet = catalogue::list_properties(&store, Some(Status::Visited))
        .unwrap()
        .remove(0);
    kitnet.status = Status::Rented;
    kitnet.iptu = 0.0;
    let saved = catalogue::update_property(&mut store, kitnet).unwrap();
    assert_eq!(saved.total_cost, 1350.0);
    assert_eq!(
        saved.created_at,
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    );

    assert!(catalogue::list_properties(&store, Some(Status::Visited))
        .unwrap()
        .is_empty());
    catalogue::delete_property(&mut store, saved.id.unwrap()).unwrap();
    assert_eq!(catalogue::list_properties(&store, None).unwrap().len(), 1);
}
