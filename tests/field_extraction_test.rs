use doc_intake::core::comparison::{compare, ExpiryStatus, FieldMatch};
use doc_intake::domain::model::NO_TEXT_DETECTED;
use doc_intake::extract;

/// 多行的 OCR 輸出，標籤與值之間有換行
#[test]
fn test_multiline_passport_text() {
    let text = "PASSPORT\nP<EXAMPLE\nPASSPORT NO: not-a-number\nFULL NAME:\nEmilia Kazimova\nEXPIRY: 21/11/2031\nPAS C01X00T47";
    let fields = extract(text);

    assert_eq!(fields.name.as_deref(), Some("Emilia Kazimova"));
    assert_eq!(fields.expiry_date.as_deref(), Some("21/11/2031"));
    // "PASSPORT\nP" 不構成號碼，第一個成立的是 PAS C01X00T47
    assert_eq!(fields.number.as_deref(), Some("C01X00T47"));
}

#[test]
fn test_extraction_never_fails_on_odd_input() {
    let inputs = [
        "",
        " ",
        NO_TEXT_DETECTED,
        "ÄÖÜ ßçñ 漢字 🚀",
        "NAME:",
        "ID-",
        "EXP 99/99",
        "\n\n\t",
    ];
    for input in inputs {
        let fields = extract(input);
        assert!(fields.is_empty(), "unexpected match in {:?}: {:?}", input, fields);
    }
}

#[test]
fn test_extracted_fields_feed_comparison() {
    let fields = extract("NAME: Jane Cooper ID-48213907 VALID THRU 2030-06-15");
    let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    let report = compare(&fields, "Jane", "Cooper", today);
    assert_eq!(report.name, FieldMatch::Match);
    assert_eq!(report.expiry, ExpiryStatus::Valid);
    assert!(!report.needs_review());

    let report = compare(&fields, "Emilia", "Kazimova", today);
    assert!(matches!(report.name, FieldMatch::Mismatch { .. }));
    assert!(report.needs_review());
}
