#[derive(wirebind::Record)]
struct Nothing {}

fn main() {
    use wirebind::Record;

    assert!(Nothing::schema().fields().is_empty());
}
