use super::*;

#[test]
fn test_log_format_parse() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("fancy"), LogFormat::Text);
    assert_eq!(LogFormat::default(), LogFormat::Text);
}

#[test]
fn test_filter_accepts_directives() {
    let filter = EnvFilter::builder().parse_lossy("fluentgen_resolver=trace,warn");
    assert!(filter.to_string().contains("fluentgen_resolver=trace"));
}
