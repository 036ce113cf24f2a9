//! Settings file parsing and the structural errors it reports.

#![cfg(feature = "std")]

use stepper_settings::{
    fix_settings_str, load_settings, parse_settings, ControlMode, CurrentLimitDuringError, Error,
    ParseError, Pin, PinFlag, PinFunction, Product, Registry, StepMode,
};

fn registry() -> Registry {
    Registry::new().expect("built-in registry should build")
}

fn parse_error(content: &str) -> ParseError {
    match parse_settings(content, &registry()) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected a parse error, got {:?}", other),
    }
}

// =============================================================================
// Valid documents
// =============================================================================

const T500_SETTINGS: &str = r#"
product = "T500"
control_mode = "encoder_position"
soft_error_response = "halt_and_hold"
soft_error_position = -1000
input_scaling_degree = "cubic"
tx_config = "encoder pullup"
rx_config = "encoder"
rc_config = "kill_switch active_high pullup"
current_limit = 1092
current_limit_during_error = 495
step_mode = 8
decel_max_during_error = 20000
"#;

#[test]
fn test_parse_full_document() {
    let settings = parse_settings(T500_SETTINGS, &registry()).expect("Failed to parse settings");

    assert_eq!(settings.product, Product::T500);
    assert_eq!(settings.control_mode, ControlMode::EncoderPosition);
    assert_eq!(settings.soft_error_position, -1000);
    assert_eq!(settings.pin(Pin::Tx).function, PinFunction::Encoder);
    assert!(settings.pin(Pin::Tx).flags.get(PinFlag::Pullup));
    assert_eq!(settings.pin(Pin::Rc).function, PinFunction::KillSwitch);
    assert!(settings.pin(Pin::Rc).flags.active_high);
    assert_eq!(settings.current_limit, 1092);
    assert_eq!(
        settings.current_limit_during_error,
        CurrentLimitDuringError::Milliamps(495)
    );
    assert_eq!(settings.step_mode, StepMode::Eighth);
    assert_eq!(settings.decel_max_during_error, Some(20000));
    assert_eq!(settings.i2c_address, None);
    assert_eq!(settings.decay_mode, None);
}

#[test]
fn test_product_name_is_case_insensitive() {
    let settings = parse_settings("product = \"t834\"", &registry()).expect("Failed to parse");
    assert_eq!(settings.product, Product::T834);
}

#[test]
fn test_fix_settings_str() {
    let (text, warnings) = fix_settings_str(T500_SETTINGS, &registry()).expect("Failed to fix");
    assert!(warnings.is_empty(), "{}", warnings);
    assert!(text.starts_with("product = \"T500\"\n"));
    assert!(text.contains("rc_config = \"kill_switch pullup active_high\"\n"));
    assert!(text.contains("decel_max_during_error = 20000\n"));
}

#[test]
fn test_fix_settings_str_reports_changes() {
    let (text, warnings) =
        fix_settings_str("product = \"T825\"\ncurrent_limit = 3969\n", &registry())
            .expect("Failed to fix");
    assert!(text.contains("current_limit = 3968\n"));
    assert_eq!(
        warnings.to_string(),
        "Warning: The current limit was too high so it will be lowered to 3968 mA.\n"
    );
}

// =============================================================================
// Structural errors
// =============================================================================

#[test]
fn test_missing_product() {
    assert_eq!(parse_error("current_limit = 192"), ParseError::MissingProduct);
}

#[test]
fn test_unknown_product() {
    let e = parse_error("product = \"T999\"");
    assert!(matches!(&e, ParseError::UnknownProduct(name) if name == "T999"));
    assert_eq!(e.to_string(), "Unrecognized product name 'T999'.");
}

#[test]
fn test_product_must_be_a_string() {
    assert!(matches!(
        parse_error("product = 825"),
        ParseError::InvalidValue { field } if field == "product"
    ));
}

#[test]
fn test_unknown_field() {
    let e = parse_error("product = \"T825\"\nmax_speed = 100");
    assert!(matches!(&e, ParseError::UnknownField(name) if name == "max_speed"));
    assert_eq!(e.to_string(), "Unrecognized key 'max_speed'.");
}

#[test]
fn test_optional_field_missing_from_product() {
    // T500 has no I2C address, T249 no decay mode, T825 no decel during error.
    for (content, key) in [
        ("product = \"T500\"\ni2c_address = 14", "i2c_address"),
        ("product = \"T249\"\ndecay_mode = \"mixed\"", "decay_mode"),
        ("product = \"T825\"\ndecel_max_during_error = 0", "decel_max_during_error"),
    ] {
        assert!(
            matches!(parse_error(content), ParseError::UnknownField(ref name) if name == key),
            "{}",
            content
        );
    }
}

#[test]
fn test_out_of_range() {
    let e = parse_error("product = \"T825\"\nvin_calibration = 40000");
    assert!(matches!(&e, ParseError::OutOfRange { field } if field == "vin_calibration"));
    assert_eq!(e.to_string(), "The vin_calibration value is out of range.");

    assert!(matches!(
        parse_error("product = \"T825\"\ncurrent_limit = -5"),
        ParseError::OutOfRange { field } if field == "current_limit"
    ));
    assert!(matches!(
        parse_error("product = \"T825\"\ncurrent_limit_during_error = 4294967296"),
        ParseError::OutOfRange { field } if field == "current_limit_during_error"
    ));
}

#[test]
fn test_invalid_values() {
    for (line, key) in [
        ("control_mode = \"joystick\"", "control_mode"),
        ("control_mode = 3", "control_mode"),
        ("step_mode = 3", "step_mode"),
        ("step_mode = \"full\"", "step_mode"),
        ("sda_config = \"user_io user_input\"", "sda_config"),
        ("sda_config = \"pullup pullup\"", "sda_config"),
        ("rx_config = \"blink\"", "rx_config"),
        ("never_sleep = 1", "never_sleep"),
        ("serial_baud_rate = 9600.0", "serial_baud_rate"),
    ] {
        let content = format!("product = \"T825\"\n{}", line);
        assert!(
            matches!(parse_error(&content), ParseError::InvalidValue { ref field } if field == key),
            "{}",
            line
        );
    }
}

#[test]
fn test_first_error_in_document_order() {
    let e = parse_error("product = \"T825\"\nnever_sleep = 1\nbogus = 2\n");
    assert!(matches!(e, ParseError::InvalidValue { field } if field == "never_sleep"));
}

#[test]
fn test_syntax_error() {
    let e = parse_error("product = \"T825\"\ncurrent_limit = \n");
    assert!(matches!(e, ParseError::Syntax(_)));
    assert!(e.to_string().starts_with("Failed to load document: "));
}

#[test]
fn test_error_wraps_parse_error() {
    let e = parse_settings("", &registry()).unwrap_err();
    assert_eq!(e, Error::Parse(ParseError::MissingProduct));
    assert_eq!(
        e.to_string(),
        "There was an error reading the settings file: \
         No product was specified in the settings file."
    );
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_load_settings_from_file() {
    let path = std::env::temp_dir().join(format!("stepper-settings-{}.toml", std::process::id()));
    std::fs::write(&path, T500_SETTINGS).expect("Failed to write settings file");

    let loaded = load_settings(&path, &registry());
    let _ = std::fs::remove_file(&path);

    let settings = loaded.expect("Failed to load settings");
    assert_eq!(settings.product, Product::T500);
    assert_eq!(settings.current_limit, 1092);
}

#[test]
fn test_load_settings_missing_file() {
    let path = std::env::temp_dir().join("stepper-settings-does-not-exist.toml");
    match load_settings(&path, &registry()) {
        Err(Error::Parse(ParseError::Io(msg))) => assert!(!msg.is_empty()),
        other => panic!("expected an I/O error, got {:?}", other),
    }
}
