use json_vault::{json, Database, SavePolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join("json_vault_example_builder.json");
    let _ = std::fs::remove_file(&path);

    // two-space indent, write after every change, no exit save
    let db = Database::builder(&path)
        .default(&json!({"name": "json-vault", "version": "0.1.0"}))
        .indent(2)
        .policy(SavePolicy::Immediate)
        .save_at_exit(false)
        .open()?;

    db.set_item("status", "awesome")?;

    // the file on disk is already up to date
    let contents = std::fs::read_to_string(db.path())?;
    println!("On-disk JSON:\n{contents}");

    // a second open hands back the same instance
    let again = Database::open(&path)?;
    println!("same instance: {}", std::sync::Arc::ptr_eq(&db, &again));

    println!("\nDebug output: {db:?}");

    let _ = std::fs::remove_file(&path);
    Ok(())
}
