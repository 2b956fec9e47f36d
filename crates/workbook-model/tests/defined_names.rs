use pretty_assertions::assert_eq;
use workbook_model::{
    validate_defined_name, DefinedNameScope, DefinedNameValidationError, ModelError, Workbook,
    EXCEL_DEFINED_NAME_MAX_LEN,
};

#[test]
fn validate_defined_name_accepts_common_and_builtin_names() {
    for name in [
        "MyRange",
        "_MyRange",
        "Name1",
        "Name.With.Dots",
        r"\BackslashStart",
        "_xlnm._FilterDatabase",
    ] {
        assert_eq!(validate_defined_name(name), Ok(()), "name should be valid: {name}");
    }
}

#[test]
fn validate_defined_name_rejects_invalid_names() {
    assert_eq!(validate_defined_name(""), Err(DefinedNameValidationError::Empty));
    assert_eq!(
        validate_defined_name("A1"),
        Err(DefinedNameValidationError::LooksLikeCellReference)
    );
    assert_eq!(
        validate_defined_name("R1C1"),
        Err(DefinedNameValidationError::LooksLikeCellReference)
    );
    assert_eq!(
        validate_defined_name("1Name"),
        Err(DefinedNameValidationError::InvalidStartCharacter('1'))
    );
    assert_eq!(
        validate_defined_name("My Name"),
        Err(DefinedNameValidationError::InvalidCharacter { ch: ' ', index: 2 })
    );
    let long = "a".repeat(EXCEL_DEFINED_NAME_MAX_LEN + 1);
    assert!(matches!(
        validate_defined_name(&long),
        Err(DefinedNameValidationError::TooLong { .. })
    ));
}

#[test]
fn names_are_unique_per_scope() {
    let mut wb = Workbook::new();
    let sheet1 = wb.add_sheet("Sheet1").unwrap();

    wb.set_defined_name("Rate", DefinedNameScope::Workbook, "=Sheet1!$B$1")
        .unwrap();
    wb.set_defined_name("Rate", DefinedNameScope::Sheet(sheet1), "=$C$1")
        .unwrap();
    assert_eq!(
        wb.set_defined_name("RATE", DefinedNameScope::Workbook, "=1"),
        Err(ModelError::DuplicateDefinedName("RATE".into()))
    );
    assert_eq!(
        wb.set_defined_name("A1", DefinedNameScope::Workbook, "=1"),
        Err(ModelError::InvalidDefinedName("A1".into()))
    );
    assert_eq!(
        wb.set_defined_name("Other", DefinedNameScope::Sheet(42), "=1"),
        Err(ModelError::SheetNotFound("42".into()))
    );

    let global = wb.defined_name("rate", DefinedNameScope::Workbook).unwrap();
    assert_eq!(global.refers_to, "Sheet1!$B$1");
    let local = wb.defined_name("Rate", DefinedNameScope::Sheet(sheet1)).unwrap();
    assert_eq!(local.refers_to, "$C$1");
}
