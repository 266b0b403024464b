//! Manifest display formatting
//!
//! Formats cached manifests as a numbered listing and as a full detail view.

use crate::models::Manifest;

/// Format the cached manifests as `<id> - [<date>] name: <name>` rows
///
/// Ids are positions in the registry and are what `show` accepts.
pub fn format_manifest_list(manifests: &[Manifest]) -> String {
    if manifests.is_empty() {
        return "No backups found.\nFetch the catalog with: bkp sync".to_string();
    }

    let mut output = String::new();
    for (id, manifest) in manifests.iter().enumerate() {
        output.push_str(&format!(
            "{:>5} - [{}] name: {}\n",
            id,
            manifest.date,
            manifest.name()
        ));
    }
    output.push_str(&format!("\nTotal: {} backup(s)", manifests.len()));
    output
}

/// Format one manifest with every field and its remote archive location
pub fn format_manifest_body(manifest: &Manifest) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", manifest.name()));
    output.push_str(&format!("{}\n\n", "=".repeat(manifest.name().len())));

    section(&mut output, "Summary", &manifest.summary);
    section(&mut output, "Background", &manifest.background);
    section(&mut output, "Date", &manifest.date);
    section(&mut output, "Owner", &manifest.owner);
    section(&mut output, "Ticket", &manifest.ticket);
    section(&mut output, "Bucket", &manifest.bucket);
    section(&mut output, "Path", &manifest.path);
    section(&mut output, "Directory", &manifest.directory);
    section(&mut output, "S3 Path", &manifest.archive_key().uri());

    output.truncate(output.trim_end().len());
    output
}

fn section(output: &mut String, title: &str, body: &str) {
    output.push_str(title);
    output.push_str(":\n");
    for line in body.lines() {
        output.push_str("  ");
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
}
