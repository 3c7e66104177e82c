//! Integration tests for declared element types
//!
//! The fixture is an invented `<p:parent>` element with one attribute of
//! each cardinality and one child of each cardinality, declared through
//! `define_element!` the way a downstream crate would.

mod common;

use common::XmlBuilder;
use oxml::simple_types::{validate_int_in_range, BaseIntType, SimpleType, XsdValue};
use oxml::xmlchemy::{AttributeDescriptor, ElementType, MemberKind};
use oxml::{define_element, parse_xml, qn, Element, Error, Result};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// =============================================================================
// Fixture element types
// =============================================================================

/// Integer restricted to 1..=42
#[derive(Debug)]
pub struct StIntegerType;

impl BaseIntType for StIntegerType {
    const NAME: &'static str = "ST_IntegerType";

    fn validate(value: i64) -> Result<()> {
        validate_int_in_range(value, 1, 42)
    }
}

define_element! {
    /// `<p:parent>`, an invented element for use in testing
    pub struct CtParent: CtParentExt = ("CT_Parent", "p:parent") {
        zom_child: ZeroOrMore("p:zomChild", successors = []),
        zoo_child: ZeroOrOne("p:zooChild", successors = []),
        opt_attr: OptionalAttribute("optAttr", StIntegerType),
        req_attr: RequiredAttribute("reqAttr", StIntegerType),
    }
}

define_element! {
    /// `<p:zomChild>`, a child that may repeat
    pub struct CtZomChild: CtZomChildExt = ("CT_ZomChild", "p:zomChild") {}
}

define_element! {
    /// `<p:zooChild>`, a child that appears at most once
    pub struct CtZooChild: CtZooChildExt = ("CT_ZooChild", "p:zooChild") {}
}

define_element! {
    /// `<p:seq>`, exercises insertion in front of successors
    pub struct CtSequence: CtSequenceExt = ("CT_Sequence", "p:seq") {
        first: ZeroOrMore("p:a", successors = ["p:b", "p:c"]),
        second: ZeroOrOne("p:b", successors = ["p:c"]),
        third: ZeroOrOne("p:c", successors = []),
    }
}

define_element! {
    /// `<p:custom>`, overrides generated child methods by hand
    pub struct CtCustom: CtCustomExt = ("CT_Custom", "p:custom") {
        item: ZeroOrOne("p:item", successors = []),
        flag: OptionalAttribute("flag", oxml::simple_types::XsdBoolean, default = false),
    }
    overrides {
        fn new_item(&self) -> Result<Element> {
            let mut item = oxml::oxml_element("p:item")?;
            item.set_text("made by hand");
            Ok(item)
        }
    }
}

fn register() {
    CtParent::register().unwrap();
    CtZomChild::register().unwrap();
    CtZooChild::register().unwrap();
    CtSequence::register().unwrap();
    CtCustom::register().unwrap();
}

fn a_parent() -> XmlBuilder {
    register();
    XmlBuilder::new("p:parent").with_nsdecls(&["p"])
}

fn a_zom_child() -> XmlBuilder {
    XmlBuilder::new("p:zomChild")
}

fn a_zoo_child() -> XmlBuilder {
    XmlBuilder::new("p:zooChild")
}

// =============================================================================
// Element classes
// =============================================================================

#[test]
fn test_parsed_elements_carry_registered_classes() {
    let parent = a_parent().with_child(a_zom_child()).element();
    assert!(parent.is_instance::<CtParent>());
    assert!(parent.children()[0].is_instance::<CtZomChild>());
    assert!(!parent.is_instance::<CtZooChild>());
    assert_eq!(parent.class().map(|c| c.name()), Some("CT_Parent"));
}

#[test]
fn test_class_member_table() {
    let cls = CtParent::class();
    for name in [
        "zom_child_lst",
        "new_zom_child",
        "insert_zom_child",
        "add_zom_child",
        "zoo_child",
        "new_zoo_child",
        "insert_zoo_child",
        "add_zoo_child",
        "get_or_add_zoo_child",
        "remove_zoo_child",
        "opt_attr",
        "req_attr",
    ] {
        assert!(cls.has_member(name), "missing member {}", name);
    }
    assert_eq!(cls.nsptag(), "p:parent");
    assert_eq!(cls.member("opt_attr").unwrap().kind(), MemberKind::Property);
}

#[test]
fn test_class_is_built_once() {
    assert!(std::ptr::eq(CtParent::class(), CtParent::class()));
}

// =============================================================================
// OptionalAttribute
// =============================================================================

#[test]
fn test_optional_attribute_getter() {
    let parent = a_parent().with_attr("optAttr", "24").element();
    assert_eq!(parent.opt_attr().unwrap(), Some(24));
}

#[test]
fn test_optional_attribute_absent_is_none() {
    let parent = a_parent().element();
    assert_eq!(parent.opt_attr().unwrap(), None);
}

#[test]
fn test_optional_attribute_setter() {
    let mut parent = a_parent().with_attr("optAttr", "42").element();
    parent.set_opt_attr(36).unwrap();
    assert_eq!(
        parent.xml().unwrap(),
        a_parent().with_attr("optAttr", 36).xml()
    );
}

#[test]
fn test_optional_attribute_none_removes() {
    let mut parent = a_parent().with_attr("optAttr", "42").element();
    parent.set_opt_attr(None).unwrap();
    assert_eq!(parent.xml().unwrap(), a_parent().xml());
    parent.set_opt_attr(None).unwrap();
    assert_eq!(parent.xml().unwrap(), a_parent().xml());
}

#[test]
fn test_optional_attribute_default_removes() {
    register();
    let mut custom = CtCustom::new_element().unwrap();
    assert!(!custom.flag().unwrap());
    custom.set_flag(true).unwrap();
    assert_eq!(custom.get("flag"), Some("1"));
    custom.set_flag(false).unwrap();
    assert!(!custom.has_attribute("flag"));
    assert!(!custom.flag().unwrap());
}

#[test]
fn test_optional_attribute_malformed_value() {
    let parent = a_parent().with_attr("optAttr", "foo").element();
    assert!(matches!(parent.opt_attr(), Err(Error::Value(_))));
}

#[test]
fn test_optional_attribute_docstring() {
    let doc = CtParent::OPT_ATTR.docstring();
    assert!(doc.starts_with("ST_IntegerType type-converted value of "));
    assert_eq!(CtParent::class().member("opt_attr").unwrap().doc(), doc);
}

proptest! {
    #[test]
    fn prop_optional_attribute_round_trip(value in 1i64..=42) {
        let mut parent = a_parent().element();
        parent.set_opt_attr(value).unwrap();
        prop_assert_eq!(parent.opt_attr().unwrap(), Some(value));
        let expected = a_parent().with_attr("optAttr", value).xml();
        prop_assert_eq!(parent.xml().unwrap(), expected);
    }

    #[test]
    fn prop_out_of_range_rejected(value in prop_oneof![i64::MIN..1i64, 43i64..i64::MAX]) {
        let mut parent = a_parent().with_attr("optAttr", "7").element();
        prop_assert!(parent.set_opt_attr(value).unwrap_err().is_invalid_assignment());
        prop_assert_eq!(parent.get("optAttr"), Some("7"));
    }
}

// =============================================================================
// RequiredAttribute
// =============================================================================

#[test]
fn test_required_attribute_getter() {
    let parent = a_parent().with_attr("reqAttr", "42").element();
    assert_eq!(parent.req_attr().unwrap(), 42);
}

#[test]
fn test_required_attribute_setter() {
    let mut parent = a_parent().with_attr("reqAttr", "42").element();
    parent.set_req_attr(24).unwrap();
    assert_eq!(
        parent.xml().unwrap(),
        a_parent().with_attr("reqAttr", 24).xml()
    );
}

#[test]
fn test_required_attribute_docstring() {
    assert!(CtParent::REQ_ATTR
        .docstring()
        .starts_with("ST_IntegerType type-converted value of "));
}

#[test]
fn test_required_attribute_missing_raises() {
    let parent = a_parent().element();
    let err = parent.req_attr().unwrap_err();
    assert!(matches!(err, Error::InvalidXml(_)));
    assert!(err.to_string().contains("reqAttr"));
}

#[test]
fn test_required_attribute_invalid_assignment() {
    let cases = [
        (XsdValue::Null, "type"),
        (XsdValue::Integer(-4), "value"),
        (XsdValue::from("2"), "type"),
        (XsdValue::Integer(50), "value"),
    ];
    for (value, kind) in cases {
        let mut parent = a_parent().with_attr("reqAttr", 1).element();
        let err = parent.set_property("req_attr", &value).unwrap_err();
        match kind {
            "type" => assert!(matches!(err, Error::Type(_)), "{} gave {:?}", value, err),
            _ => assert!(matches!(err, Error::Value(_)), "{} gave {:?}", value, err),
        }
        assert_eq!(parent.get("reqAttr"), Some("1"));
    }
}

#[test]
fn test_property_access_by_name() {
    let mut parent = a_parent().with_attr("reqAttr", 3).element();
    assert_eq!(
        parent.get_property("req_attr").unwrap(),
        XsdValue::Integer(3)
    );
    assert_eq!(parent.get_property("opt_attr").unwrap(), XsdValue::Null);
    parent
        .set_property("opt_attr", &XsdValue::Integer(9))
        .unwrap();
    assert_eq!(parent.opt_attr().unwrap(), Some(9));
    assert!(matches!(
        parent.set_property("zom_child", &XsdValue::Integer(1)),
        Err(Error::Key(_))
    ));
    assert!(matches!(
        parent.get_property("no_such_attr"),
        Err(Error::Key(_))
    ));
}

// =============================================================================
// ZeroOrMore
// =============================================================================

fn zom_parent_bldr(zom_child_is_present: bool) -> XmlBuilder {
    let bldr = a_parent();
    if zom_child_is_present {
        bldr.with_child(a_zom_child())
    } else {
        bldr
    }
}

#[test]
fn test_zero_or_more_list_getter() {
    let parent = zom_parent_bldr(true).element();
    let zom_child = parent.find("p:zomChild").unwrap();
    assert!(std::ptr::eq(parent.zom_child_lst().unwrap()[0], zom_child));
}

#[test]
fn test_zero_or_more_list_empty() {
    let parent = zom_parent_bldr(false).element();
    assert!(parent.zom_child_lst().unwrap().is_empty());
}

#[test]
fn test_zero_or_more_creator() {
    let parent = zom_parent_bldr(false).element();
    let zom_child = parent.new_zom_child().unwrap();
    assert_eq!(
        zom_child.xml().unwrap(),
        a_zom_child().with_nsdecls(&["p"]).xml()
    );
    assert!(zom_child.is_instance::<CtZomChild>());
}

#[test]
fn test_zero_or_more_inserter() {
    let mut parent = zom_parent_bldr(false).element();
    let zom_child = a_zom_child().with_nsdecls(&["p"]).element();
    parent.insert_zom_child(zom_child).unwrap();
    assert_eq!(parent.xml().unwrap(), zom_parent_bldr(true).xml());
    assert!(CtParent::class()
        .member("insert_zom_child")
        .unwrap()
        .doc()
        .starts_with("Insert the passed ``<p:zomChild>`` "));
}

#[test]
fn test_zero_or_more_adder() {
    let mut parent = zom_parent_bldr(false).element();
    let zom_child = parent.add_zom_child().unwrap();
    assert!(zom_child.is_instance::<CtZomChild>());
    assert_eq!(parent.xml().unwrap(), zom_parent_bldr(true).xml());
    assert!(CtParent::class()
        .member("add_zom_child")
        .unwrap()
        .doc()
        .starts_with("Add a new ``<p:zomChild>`` child element "));
}

#[test]
fn test_zero_or_more_removes_bare_property_name() {
    let cls = CtParent::class();
    assert!(!cls.has_member("zom_child"));
    assert!(!cls.has_member("get_or_add_zom_child"));
    assert!(!cls.has_member("remove_zom_child"));
}

#[test]
fn test_zero_or_more_list_preserves_document_order() {
    let mut parent = a_parent()
        .with_child(a_zom_child().with_attr("n", 1))
        .with_child(a_zom_child().with_attr("n", 2))
        .element();
    parent.add_zom_child().unwrap().set("n", "3").unwrap();
    let ns: Vec<_> = parent
        .zom_child_lst()
        .unwrap()
        .iter()
        .map(|c| c.get("n").unwrap_or_default().to_string())
        .collect();
    assert_eq!(ns, vec!["1", "2", "3"]);
}

// =============================================================================
// ZeroOrOne
// =============================================================================

fn zoo_parent_bldr(zoo_child_is_present: bool) -> XmlBuilder {
    let bldr = a_parent();
    if zoo_child_is_present {
        bldr.with_child(a_zoo_child())
    } else {
        bldr
    }
}

#[test]
fn test_zero_or_one_getter() {
    for present in [true, false] {
        let parent = zoo_parent_bldr(present).element();
        let expected = parent.find("p:zooChild");
        match (parent.zoo_child().unwrap(), expected) {
            (Some(actual), Some(expected)) => assert!(std::ptr::eq(actual, expected)),
            (None, None) => {}
            other => panic!("getter mismatch: {:?}", other),
        }
    }
}

#[test]
fn test_zero_or_one_adder() {
    let mut parent = zoo_parent_bldr(false).element();
    let zoo_child = parent.add_zoo_child().unwrap();
    assert!(zoo_child.is_instance::<CtZooChild>());
    assert_eq!(parent.xml().unwrap(), zoo_parent_bldr(true).xml());
    assert!(CtParent::class()
        .member("add_zoo_child")
        .unwrap()
        .doc()
        .starts_with("Add a new ``<p:zooChild>`` child element "));
}

#[test]
fn test_zero_or_one_inserter() {
    let mut parent = a_parent().element();
    let zoo_child = a_zoo_child().with_nsdecls(&["p"]).element();
    parent.insert_zoo_child(zoo_child).unwrap();
    assert_eq!(parent.xml().unwrap(), zoo_parent_bldr(true).xml());
    assert!(CtParent::class()
        .member("insert_zoo_child")
        .unwrap()
        .doc()
        .starts_with("Insert the passed ``<p:zooChild>`` "));
}

#[test]
fn test_zero_or_one_get_or_add() {
    for present in [true, false] {
        let mut parent = zoo_parent_bldr(present).element();
        let zoo_child = parent.get_or_add_zoo_child().unwrap();
        assert!(zoo_child.is_instance::<CtZooChild>());
        assert_eq!(parent.xml().unwrap(), zoo_parent_bldr(true).xml());
    }
}

#[test]
fn test_zero_or_one_get_or_add_is_idempotent() {
    let mut parent = zoo_parent_bldr(false).element();
    let first: *const Element = parent.get_or_add_zoo_child().unwrap();
    let second: *const Element = parent.get_or_add_zoo_child().unwrap();
    assert_eq!(first, second);
    assert_eq!(parent.children().len(), 1);
}

#[test]
fn test_zero_or_one_remover() {
    for present in [true, false] {
        let mut parent = zoo_parent_bldr(present).element();
        parent.remove_zoo_child().unwrap();
        assert_eq!(parent.xml().unwrap(), zoo_parent_bldr(false).xml());
        assert!(parent.zoo_child().unwrap().is_none());
    }
}

#[test]
fn test_zero_or_one_remover_removes_every_match() {
    let mut parent = a_parent()
        .with_child(a_zoo_child())
        .with_child(a_zom_child())
        .with_child(a_zoo_child())
        .element();
    parent.remove_zoo_child().unwrap();
    assert_eq!(
        parent.xml().unwrap(),
        a_parent().with_child(a_zom_child()).xml()
    );
}

// =============================================================================
// Child ordering
// =============================================================================

#[test]
fn test_insert_before_first_successor_present() {
    register();
    let mut seq = parse_xml(&format!(
        "<p:seq {}><p:c/></p:seq>",
        oxml::nsdecls(&["p"]).unwrap()
    ))
    .unwrap();
    seq.add_first().unwrap();
    let tags: Vec<&str> = seq.children().iter().map(|c| c.local_name()).collect();
    assert_eq!(tags, vec!["a", "c"]);
}

#[test]
fn test_insert_before_earliest_successor_in_document_order() {
    register();
    let mut seq = parse_xml(&format!(
        "<p:seq {}><p:c/><p:b/></p:seq>",
        oxml::nsdecls(&["p"]).unwrap()
    ))
    .unwrap();
    seq.add_first().unwrap();
    let tags: Vec<&str> = seq.children().iter().map(|c| c.local_name()).collect();
    assert_eq!(tags, vec!["a", "c", "b"]);
}

#[test]
fn test_adds_stay_before_successors() {
    register();
    let mut seq = CtSequence::new_element().unwrap();
    seq.get_or_add_third().unwrap();
    seq.get_or_add_second().unwrap();
    for _ in 0..3 {
        seq.add_first().unwrap();
    }
    let tags: Vec<&str> = seq.children().iter().map(|c| c.local_name()).collect();
    assert_eq!(tags, vec!["a", "a", "a", "b", "c"]);
    assert_eq!(seq.first_lst().unwrap().len(), 3);
}

#[test]
fn test_no_successors_appends() {
    register();
    let mut seq = CtSequence::new_element().unwrap();
    seq.add_first().unwrap();
    seq.get_or_add_third().unwrap();
    seq.add_first().unwrap();
    let tags: Vec<&str> = seq.children().iter().map(|c| c.local_name()).collect();
    assert_eq!(tags, vec!["a", "a", "c"]);
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn test_explicit_creator_is_used_by_adders() {
    register();
    let mut custom = CtCustom::new_element().unwrap();
    assert_eq!(custom.add_item().unwrap().text(), Some("made by hand"));
    custom.remove_item().unwrap();
    assert_eq!(custom.get_or_add_item().unwrap().text(), Some("made by hand"));

    let member = CtCustom::class().member("new_item").unwrap();
    assert_eq!(member.kind(), MemberKind::Explicit);
    assert_eq!(
        CtCustom::class().member("add_item").unwrap().kind(),
        MemberKind::Method
    );
}

// =============================================================================
// Accessors of another element type
// =============================================================================

#[test]
fn test_accessors_reject_elements_of_another_tag() {
    register();
    let mut seq = CtSequence::new_element().unwrap();
    assert!(matches!(seq.set_flag(true), Err(Error::Type(_))));
    assert!(!seq.has_attribute("flag"));
    assert!(matches!(seq.req_attr(), Err(Error::Type(_))));
    assert!(matches!(seq.zoo_child(), Err(Error::Type(_))));
    assert!(matches!(seq.add_zom_child(), Err(Error::Type(_))));
    assert!(matches!(seq.get_or_add_zoo_child(), Err(Error::Type(_))));
    assert!(seq.children().is_empty());

    let mut sp = oxml::oxml_element("p:sp").unwrap();
    assert!(matches!(sp.set_opt_attr(3), Err(Error::Type(_))));
    assert_eq!(sp.xml().unwrap(), XmlBuilder::new("p:sp").with_nsdecls(&["p"]).xml());
}

// =============================================================================
// Keyword-style adders
// =============================================================================

#[test]
fn test_add_with_assigns_properties_before_insert() {
    register();
    let mut seq = CtSequence::new_element().unwrap();
    let err = seq
        .add_first_with(&[("nope", XsdValue::Integer(1))])
        .unwrap_err();
    assert!(matches!(err, Error::Key(_)));
    assert!(seq.children().is_empty());
}

// =============================================================================
// Concrete scenario
// =============================================================================

#[test]
fn test_parent_scenario() {
    let mut parent = a_parent().with_attr("reqAttr", 5).element();
    parent.add_zom_child().unwrap();
    parent.add_zom_child().unwrap();
    assert_eq!(
        parent.xml().unwrap(),
        a_parent()
            .with_attr("reqAttr", 5)
            .with_child(a_zom_child())
            .with_child(a_zom_child())
            .xml()
    );
    assert_eq!(parent.req_attr().unwrap(), 5);

    let err = parent.set_req_attr(50).unwrap_err();
    assert!(matches!(err, Error::Value(_)));
    assert_eq!(
        err.to_string(),
        "value error: value must be in range 1 to 42 inclusive, got 50"
    );
    assert_eq!(parent.get("reqAttr"), Some("5"));
}

#[test]
fn test_prefixed_attribute_names_resolve() {
    assert_eq!(
        qn("r:id").unwrap().to_string(),
        "{http://schemas.openxmlformats.org/officeDocument/2006/relationships}id"
    );
    assert_eq!(
        <StIntegerType as SimpleType>::from_xml("7").unwrap(),
        7
    );
}
