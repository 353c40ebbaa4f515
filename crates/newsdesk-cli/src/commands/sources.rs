use anyhow::Result;

use newsdesk_core::Newsdesk;

use super::print_json;

pub fn run(desk: &Newsdesk, json: bool) -> Result<()> {
    let sources = desk.registry().list();

    if json {
        return print_json(&sources);
    }

    println!("Sources ({}):\n", sources.len());
    for source in sources {
        println!("  {}  {}", source.index, source.name);
        println!("     {}", source.url);
    }

    Ok(())
}
