use anyhow::Result;

use newsdesk_core::{EntryFilter, ListQuery, Newsdesk, ToggleState};

use super::{print_json, print_list};

pub async fn run(
    desk: &Newsdesk,
    disabled: Option<&str>,
    category: Option<&str>,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let query = ListQuery::new(ToggleState::decode(disabled), EntryFilter::new(category, search));
    let view = desk.list_view(&query).await;

    if json {
        return print_json(&view);
    }

    println!("{}\n", query.address());
    print_list(&view);

    Ok(())
}
