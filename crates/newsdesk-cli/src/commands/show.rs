use anyhow::Result;

use newsdesk_core::{ArticleRef, Error, Newsdesk};

use super::{print_detail, print_json};

pub async fn run(desk: &Newsdesk, id: Option<&str>, url: Option<&str>, json: bool) -> Result<()> {
    let reference = match (id, url) {
        (Some(id), _) => ArticleRef::ByComposite(id.parse()?),
        (None, Some(url)) => ArticleRef::ByUrl(url.to_string()),
        (None, None) => return Err(Error::MissingId.into()),
    };

    let detail = desk.detail_view(&reference).await?;

    if json {
        return print_json(&detail);
    }

    print_detail(&detail);
    Ok(())
}
