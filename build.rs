use std::path::Path;

fn main() {
    let catalog_dir = Path::new("catalogs");
    validate_manifest(catalog_dir);
    set_build_dependencies(catalog_dir);
}

fn validate_manifest(catalog_dir: &Path) {
    let manifest_path = catalog_dir.join("manifest.json");
    assert!(
        manifest_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         The embedded catalog needs a manifest.json next to its data files.\n",
        manifest_path.display()
    );

    let contents = std::fs::read_to_string(&manifest_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            manifest_path.display()
        );
    });

    let manifest: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            manifest_path.display()
        );
    });

    assert!(
        manifest.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {manifest}\n"
    );

    let canons = entries(&manifest, "canons");
    let schemes = entries(&manifest, "naming_schemes");

    for (i, entry) in canons.iter().enumerate() {
        validate_entry(catalog_dir, entry, "canons", i, &[]);
    }
    for (i, entry) in schemes.iter().enumerate() {
        validate_entry(
            catalog_dir,
            entry,
            "naming_schemes",
            i,
            &["ordinal_delimiter", "verse_delimiter"],
        );
    }

    println!(
        "cargo:warning=Validated catalog: {} canons, {} naming schemes",
        canons.len(),
        schemes.len()
    );
}

fn entries<'a>(manifest: &'a serde_json::Value, field: &str) -> &'a Vec<serde_json::Value> {
    let value = manifest.get(field).unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing '{field}' field\n\
             The manifest must have a top-level '{field}' array.\n"
        );
    });

    value.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: '{field}' must be an array\n\
             Got: {value}\n"
        );
    })
}

fn validate_entry(
    catalog_dir: &Path,
    entry: &serde_json::Value,
    section: &str,
    index: usize,
    extra_fields: &[&str],
) {
    let name = entry
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>");

    for field in ["name", "file"].iter().chain(extra_fields) {
        assert!(
            entry.get(*field).and_then(|v| v.as_str()).is_some(),
            "\n\nCATALOG BUILD ERROR: {section} entry '{name}' (index {index}) missing '{field}' field\n"
        );
    }

    let file = entry.get("file").and_then(|v| v.as_str()).unwrap_or("");
    let path = catalog_dir.join(file);
    assert!(
        path.exists(),
        "\n\nCATALOG BUILD ERROR: {section} entry '{name}' points at a missing file\n\
         Path: {}\n",
        path.display()
    );
    println!("cargo:rerun-if-changed={}", path.display());
}

fn set_build_dependencies(catalog_dir: &Path) {
    // Tell cargo to rerun if the manifest changes
    println!(
        "cargo:rerun-if-changed={}",
        catalog_dir.join("manifest.json").display()
    );

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
