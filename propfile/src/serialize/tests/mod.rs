//! These are really tests of the derive macros, but are better logically
//! here.

use crate::serialize::{
    deserialize_str, serialize, FromProperties, MappingWarning, MappingWarningKind,
    PropertyConverter, ToProperties,
};
use crate::{Error, PropertyFile};
use propfile_derive::{FromProperties, ToProperties};

#[test]
fn empty_struct() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Empty {}

    let file = serialize(&Empty {});
    assert!(file.is_empty());

    let (parsed, warnings) = Empty::from_properties(&file).unwrap();
    assert_eq!(parsed, Empty::default());
    assert_eq!(warnings, vec![]);
}

#[test]
fn field_names_and_renames() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Config {
        #[property(rename = "test.integer")]
        test_integer: i32,
        test_boolean: bool,
        #[property(rename = "TEST STRING")]
        test_string: String,
    }

    let config = Config {
        test_integer: 123_456,
        test_boolean: true,
        test_string: "This is a test string!".to_owned(),
    };

    let file = serialize(&config);
    assert_eq!(file.get("test.integer"), Some("123456"));
    assert_eq!(file.get("test_boolean"), Some("true"));
    assert_eq!(file.get("TEST STRING"), Some("This is a test string!"));

    let (parsed, warnings) = Config::from_properties(&file).unwrap();
    assert_eq!(parsed, config);
    assert_eq!(warnings, vec![]);
}

#[test]
fn whitespace_values_survive_text_round_trip() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Padded {
        #[property(rename = "whitespace")]
        value: String,
    }

    let padded = Padded {
        value: "    ".to_owned(),
    };

    let text = serialize(&padded).to_string();
    assert_eq!(text, "whitespace ~    \n");

    let (parsed, warnings) = deserialize_str::<Padded>(&text).unwrap();
    assert_eq!(parsed, padded);
    assert_eq!(warnings, vec![]);
}

#[test]
fn ignored_fields() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Partial {
        kept: i32,
        #[property(ignore)]
        skipped: i32,
    }

    let file = serialize(&Partial { kept: 1, skipped: 2 });
    assert_eq!(file.len(), 1);
    assert!(!file.contains("skipped"));

    let mut input = PropertyFile::new();
    input.set("kept", "3");
    input.set("skipped", "4");
    let (parsed, warnings) = Partial::from_properties(&input).unwrap();
    assert_eq!(parsed, Partial { kept: 3, skipped: 0 });
    assert_eq!(warnings, vec![]);
}

#[test]
fn optional_fields_are_omitted_when_none() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Sparse {
        required: String,
        optional: Option<i32>,
    }

    let none = Sparse {
        required: "here".to_owned(),
        optional: None,
    };
    let file = serialize(&none);
    assert!(!file.contains("optional"));

    let some = Sparse {
        required: "here".to_owned(),
        optional: Some(42),
    };
    let file = serialize(&some);
    assert_eq!(file.get("optional"), Some("42"));

    // The omitted field comes back as its default, with a warning
    let (parsed, warnings) = deserialize_str::<Sparse>("required = here").unwrap();
    assert_eq!(parsed, none);
    assert_eq!(
        warnings,
        vec![MappingWarning {
            field: "optional",
            kind: MappingWarningKind::MissingValue,
        }]
    );
}

#[test]
fn missing_field_keeps_default() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Defaults {
        present: i32,
        absent: i32,
    }

    let (parsed, warnings) = deserialize_str::<Defaults>("present = 7").unwrap();
    assert_eq!(parsed, Defaults { present: 7, absent: 0 });
    assert_eq!(
        warnings,
        vec![MappingWarning {
            field: "absent",
            kind: MappingWarningKind::MissingValue,
        }]
    );
}

#[test]
fn null_value_keeps_default() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Nullable {
        field: i32,
    }

    let mut file = PropertyFile::new();
    file.set_null("field");
    let (parsed, warnings) = Nullable::from_properties(&file).unwrap();
    assert_eq!(parsed, Nullable { field: 0 });
    assert_eq!(
        warnings,
        vec![MappingWarning {
            field: "field",
            kind: MappingWarningKind::NullValue,
        }]
    );
}

#[test]
fn conversion_failure_names_the_field() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Numeric {
        #[property(rename = "test.integer")]
        value: i32,
    }

    let result = deserialize_str::<Numeric>("test.integer = not a number");
    match result {
        Err(Error::Conversion { name, value }) => {
            assert_eq!(name, "test.integer");
            assert_eq!(value, "not a number");
        }
        other => panic!("expected Conversion, got {other:?}"),
    }
}

#[test]
fn custom_converter() {
    /// Stores a bool as `yes`/`no` instead of `true`/`false`.
    #[derive(Debug, Default)]
    struct YesNo;

    impl PropertyConverter for YesNo {
        type Value = bool;

        fn to_property(&self, value: &bool) -> Option<String> {
            Some(if *value { "yes" } else { "no" }.to_owned())
        }

        fn from_property(&self, value: &str) -> Option<bool> {
            match value {
                "yes" => Some(true),
                "no" => Some(false),
                _ => None,
            }
        }
    }

    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Flags {
        #[property(with = "YesNo")]
        enabled: bool,
    }

    let file = serialize(&Flags { enabled: true });
    assert_eq!(file.get("enabled"), Some("yes"));

    let (parsed, warnings) = deserialize_str::<Flags>("enabled = no").unwrap();
    assert_eq!(parsed, Flags { enabled: false });
    assert_eq!(warnings, vec![]);

    let result = deserialize_str::<Flags>("enabled = maybe");
    match result {
        Err(Error::Conversion { name, value }) => {
            assert_eq!(name, "enabled");
            assert_eq!(value, "maybe");
        }
        other => panic!("expected Conversion, got {other:?}"),
    }
}

#[test]
fn converter_with_rename() {
    #[derive(Debug, Default)]
    struct Celsius;

    impl PropertyConverter for Celsius {
        type Value = f64;

        fn to_property(&self, value: &f64) -> Option<String> {
            Some(format!("{value}C"))
        }

        fn from_property(&self, value: &str) -> Option<f64> {
            value.strip_suffix('C')?.trim().parse().ok()
        }
    }

    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Weather {
        #[property(rename = "temperature", with = "Celsius")]
        degrees: f64,
    }

    let file = serialize(&Weather { degrees: 21.5 });
    assert_eq!(file.get("temperature"), Some("21.5C"));

    let (parsed, warnings) = deserialize_str::<Weather>("temperature = 21.5C").unwrap();
    assert_eq!(parsed, Weather { degrees: 21.5 });
    assert_eq!(warnings, vec![]);
}

#[test]
fn full_record_round_trip() {
    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct Record {
        #[property(rename = "test.integer")]
        test_integer: i32,
        test_boolean: bool,
        #[property(rename = "TEST STRING")]
        test_string: String,
        #[property(rename = "whitespace")]
        test_whitespace: String,
        #[property(rename = "testFloat")]
        test_float: f32,
    }

    let record = Record {
        test_integer: 123_456,
        test_boolean: true,
        test_string: "This is a test string!".to_owned(),
        test_whitespace: "    ".to_owned(),
        test_float: 5.5,
    };

    let text = serialize(&record).to_string();
    // Not indoc: the `whitespace` line ends in four meaningful spaces
    let expected = concat!(
        "test.integer = 123456\n",
        "test_boolean = true\n",
        "TEST STRING = This is a test string!\n",
        "whitespace ~    \n",
        "testFloat = 5.5\n",
    );
    assert_eq!(text, expected);

    let (parsed, warnings) = deserialize_str::<Record>(&text).unwrap();
    assert_eq!(parsed, record);
    assert_eq!(warnings, vec![]);
}

#[test]
fn path_round_trip() {
    use crate::serialize::{deserialize_from_path, serialize_to_path};

    #[derive(Debug, Default, Clone, PartialEq, ToProperties, FromProperties)]
    struct OnDisk {
        name: String,
        count: u32,
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.property");

    let record = OnDisk {
        name: "disk".to_owned(),
        count: 3,
    };
    serialize_to_path(&record, &path).unwrap();

    let (parsed, warnings) = deserialize_from_path::<OnDisk>(&path).unwrap();
    assert_eq!(parsed, record);
    assert_eq!(warnings, vec![]);
}
