use wirebind::Record;
use wirebind::literal::{BoxError, FromRawText};

#[derive(Default)]
pub struct Checkmark(bool);

impl FromRawText for Checkmark {
    fn from_raw_text(&mut self, raw: &str) -> Result<(), BoxError> {
        self.0 = raw.trim_matches('"') == "✓";
        Ok(())
    }
}

#[derive(Default, serde::Deserialize)]
pub struct Percent(u8);

#[derive(Default, Record)]
pub struct Paging {
    page: u32,
    per_page: u32,
}

#[derive(Default, Record)]
#[wire(rename_all = "kebab-case")]
pub struct Search {
    #[wire(rename = "q")]
    query: String,
    #[wire(quoted)]
    exact_match: bool,
    #[wire(flatten)]
    paging: Paging,
    #[wire(skip)]
    cache_key: std::rc::Rc<String>,
    #[wire(custom)]
    confirmed: Checkmark,
    #[wire(converter)]
    discount: Percent,
    #[wire(body_only)]
    filters: std::collections::BTreeMap<String, Vec<String>>,
    extra: Option<serde_json::Value>,
    r#type: Vec<u8>,
}

fn main() {
    let schema = Search::schema();
    let wire_names: Vec<_> = schema.fields().iter().map(|f| f.key.wire_name).collect();
    assert_eq!(
        wire_names,
        [
            "q",
            "exact-match",
            "page",
            "per_page",
            "confirmed",
            "discount",
            "filters",
            "extra",
            "type"
        ]
    );
}
