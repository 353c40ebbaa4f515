use anyhow::Result;

use newsdesk_core::{Newsdesk, View};

use super::{print_detail, print_json, print_list};

pub async fn run(desk: &Newsdesk, address: &str, json: bool) -> Result<()> {
    let view = desk.open(address).await?;

    if json {
        return print_json(&view);
    }

    match &view {
        View::List(list) => print_list(list),
        View::Detail(detail) => print_detail(detail),
    }

    Ok(())
}
