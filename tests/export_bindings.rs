#![allow(clippy::expect_used, clippy::unwrap_used)]

#[path = "../src/types/mod.rs"]
mod types;

#[test]
fn export_bindings() {
    let dir = tempfile::tempdir().expect("create bindings dir");
    let out_path = dir.path().join("bindings.ts");
    let ts_cfg =
        specta::ts::ExportConfiguration::default().bigint(specta::ts::BigIntExportBehavior::Number);

    specta::export::ts_with_cfg(out_path.to_str().unwrap(), &ts_cfg)
        .expect("failed to export Specta bindings");

    let bindings = std::fs::read_to_string(&out_path).expect("read bindings");
    assert!(bindings.contains("AppError"));
    assert!(bindings.contains("INVALID_CREDENTIALS"));
    assert!(bindings.contains("UserPreferences"));
    assert!(bindings.contains("\"system\""));
}
