use json_vault::{json, Database, RootKind, Value};

fn main() -> Result<(), json_vault::Error> {
    let path = std::env::temp_dir().join("json_vault_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let db = Database::builder(&path)
        .root(RootKind::Object)
        .save_at_exit(false)
        .open()?;
    let fruit = db.dict()?;

    // insert / get / pop
    fruit.insert("apples", &3)?;
    fruit.insert("bananas", &5)?;
    println!("apples  = {}", fruit.get("apples")?);
    println!("pears   = {} (fallback)", fruit.get_or("pears", json!(0))?);

    // set_default and batch update
    let oranges = fruit.set_default("oranges", &0)?;
    println!("oranges (default 0) = {oranges}");
    fruit.update(&json!({"grapes": 12, "lemons": 7}))?;

    // snapshots
    println!("keys   = {:?}", fruit.keys()?.collect::<Vec<_>>());
    println!("len    = {}", db.count()?);

    // rejected writes leave the document alone
    let mut bad = std::collections::HashMap::new();
    bad.insert(1, "one");
    if let Err(e) = fruit.insert("bad", &bad) {
        println!("rejected: {e}");
    }

    println!("popped = {}", fruit.pop("bananas", Value::Null)?);
    db.save()?;
    db.clear()?;
    println!("after clear: len = {}", db.count()?);

    let _ = std::fs::remove_file(&path);
    Ok(())
}
