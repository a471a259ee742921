use json_vault::{Database, RootKind};

// Run twice: the second run picks up where the first left off, because the
// list is saved when the process exits.
fn main() -> Result<(), json_vault::Error> {
    let db = Database::named("scores").root(RootKind::Array).open()?;
    let scores = db.list()?;

    let next = scores.len()? as u64 * 10 + 10;
    scores.append(&next)?;
    scores.sort()?;
    println!("{} -> {}", db.path().display(), db.copy());
    Ok(())
}
