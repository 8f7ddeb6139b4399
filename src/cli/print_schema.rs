use hackernews::error::Result;
use hackernews::schema::SchemaBuilder;

/// Print the schema SDL to stdout
pub fn run() -> Result<()> {
    let schema = SchemaBuilder::new().build_schema()?;
    println!("{}", schema.sdl());
    Ok(())
}
