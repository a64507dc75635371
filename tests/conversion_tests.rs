//! Integration tests for classification and format routing

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use typeconv::{
    classify, to_collection, to_json_text, to_record, to_serialized, to_xml_text, ConverterConfig,
    Document, Kind, Limits, Node, Policy, Record, Resource, Scalar, TypeConverter,
};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Book {
    title: String,
    year: i64,
    tags: Vec<String>,
}

fn book() -> Book {
    Book {
        title: "Dune".to_string(),
        year: 1965,
        tags: vec!["sf".to_string(), "classic".to_string()],
    }
}

#[test]
fn test_classify_scenarios() {
    assert_eq!(classify(&Resource::from(r#"{"a":1}"#)), Kind::Json);
    assert_eq!(classify(&Resource::from("<a/>")), Kind::Xml);
    assert_eq!(classify(&Resource::from(json!([1, 2]))), Kind::Collection);
}

#[test]
fn test_classify_order_and_quirks() {
    // JSON is tried before XML and serialized bytes
    assert_eq!(classify(&Resource::from("[1,2]")), Kind::Json);
    assert_eq!(classify(&Resource::from("i:5;")), Kind::Serialized);
    assert_eq!(classify(&Resource::from("null")), Kind::Other);
    assert_eq!(classify(&Resource::from("")), Kind::Other);
    assert_eq!(classify(&Resource::from("<a><b></a>")), Kind::Other);
    assert_eq!(classify(&Resource::from(Record::new())), Kind::Record);
}

#[test]
fn test_to_json_text_scenario() {
    let input = Resource::from(json!({"a": 1, "b": [1, 2, 3]}));
    assert_eq!(to_json_text(&input).as_text(), Some(r#"{"a":1,"b":[1,2,3]}"#));
}

#[test]
fn test_to_xml_text_of_empty_collection_returns_input() {
    let empty = Resource::from(json!([]));
    assert_eq!(to_xml_text(&empty, "root", "item"), empty);

    let empty_map = Resource::from(json!({}));
    assert_eq!(to_xml_text(&empty_map, "root", "item"), empty_map);
}

#[test]
fn test_json_to_xml() {
    let input = Resource::from(r#"{"title":"Dune","tags":["sf","classic"]}"#);
    let xml = to_xml_text(&input, "book", "tag");
    assert_eq!(
        xml.as_text(),
        Some(
            format!(
                "{}\n<book><title>Dune</title><tags><tag>sf</tag><tag>classic</tag></tags></book>\n",
                XML_DECL
            )
            .as_str()
        )
    );
}

#[test]
fn test_xml_to_json() {
    let input = Resource::from(r#"<book id="7"><title>Dune</title><tag>sf</tag><tag>classic</tag></book>"#);
    assert_eq!(
        to_json_text(&input).as_text(),
        Some(r#"{"title":"Dune","tag":["sf","classic"]}"#)
    );
}

#[test]
fn test_serialized_to_json() {
    let input = Resource::from(r#"a:2:{s:5:"title";s:4:"Dune";s:4:"year";i:1965;}"#);
    assert_eq!(classify(&input), Kind::Serialized);
    assert_eq!(to_json_text(&input).as_text(), Some(r#"{"title":"Dune","year":1965}"#));
}

#[test]
fn test_json_to_serialized_and_back() {
    let input = Resource::from(r#"{"title":"Dune","tags":["sf"]}"#);
    let bytes = to_serialized(&input);
    assert_eq!(
        bytes.as_text(),
        Some(r#"a:2:{s:5:"title";s:4:"Dune";s:4:"tags";a:1:{i:0;s:2:"sf";}}"#)
    );
    assert_eq!(to_collection(&bytes), to_collection(&input));
}

#[test]
fn test_record_bridges_to_user_types() {
    let record = Record::from_serialize(&book()).unwrap();
    let collection = to_collection(&Resource::from(record));
    assert_eq!(
        collection,
        Resource::from(json!({"title": "Dune", "year": 1965, "tags": ["sf", "classic"]}))
    );

    let back = to_record(&Resource::from(r#"{"title":"Dune","year":1965,"tags":["sf","classic"]}"#));
    let back: Book = back.as_record().unwrap().deserialize_into().unwrap();
    assert_eq!(back, book());
}

#[test]
fn test_record_to_xml() {
    let record = Record::new()
        .with_field("name", Node::from("Ada"))
        .with_field("address", Record::new().with_field("city", Node::from("London")));
    let xml = to_xml_text(&Resource::from(record), "person", "item");
    assert_eq!(
        xml.as_text(),
        Some(
            format!(
                "{}\n<person><name>Ada</name><address><city>London</city></address></person>\n",
                XML_DECL
            )
            .as_str()
        )
    );
}

#[test]
fn test_to_record_of_xml_gives_document() {
    let record = to_record(&Resource::from("<r><a>1</a></r>"));
    let doc = record.as_document().unwrap();
    assert_eq!(doc.root().map(|r| r.name()), Some("r"));

    let handle = Resource::from(Document::from_string("<r/>").unwrap());
    assert_eq!(to_record(&handle), handle);
}

#[test]
fn test_unconvertible_values_come_back_unchanged() {
    let inputs = [
        Resource::from("plain words"),
        Resource::Scalar(Scalar::Int(7)),
        Resource::Scalar(Scalar::Null),
        Resource::from(vec![0x80u8, 0x81, 0x00]),
    ];
    for input in inputs {
        assert_eq!(to_collection(&input), input);
        assert_eq!(to_record(&input), input);
        assert_eq!(to_xml_text(&input, "root", "item"), input);
    }
}

#[test]
fn test_to_collection_is_idempotent_on_scenarios() {
    let inputs = [
        Resource::from(r#"{"a":[1,2]}"#),
        Resource::from("<r><i>a</i><i>b</i></r>"),
        Resource::from("<r>just text</r>"),
        Resource::from(r#"s:7:"{"a":1}";"#),
        Resource::from("5"),
        Resource::from("other"),
    ];
    for input in inputs {
        let once = to_collection(&input);
        assert_eq!(to_collection(&once), once, "input {:?}", input);
    }
}

#[test]
fn test_converter_with_config() {
    let config = ConverterConfig::new()
        .with_root_tag("library")
        .with_child_tags(["book", "chapter"])
        .with_policy(Policy::Merge);
    let converter = TypeConverter::with_config(config);

    let tree = Resource::from(json!([["intro", "end"]]));
    assert_eq!(
        converter.to_xml_text(&tree).as_text(),
        Some(
            format!(
                "{}\n<library><book><chapter>intro</chapter><chapter>end</chapter></book></library>\n",
                XML_DECL
            )
            .as_str()
        )
    );

    let xml = Resource::from(r#"<r><n attr="1">5</n></r>"#);
    assert_eq!(converter.to_collection(&xml), Resource::from(json!({"n": {"value": "5", "attr": "1"}})));
}

#[test]
fn test_limits_make_oversized_input_other() {
    let converter = TypeConverter::with_config(ConverterConfig::new().with_limits(Limits {
        max_xml_size: 8,
        ..Limits::default()
    }));
    let input = Resource::from("<root><a>1</a></root>");
    assert_eq!(converter.classify(&input), Kind::Other);
    assert_eq!(converter.to_collection(&input), input);
}
