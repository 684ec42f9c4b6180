use super::*;

fn valid_input() -> RawFormInput {
    RawFormInput {
        first_name: "Leo".into(),
        last_name: "Das".into(),
        email: "leodas@gmail.com".into(),
        contact: "9876543210".into(),
        college: "Anna University CEG Campus".into(),
        degree: "PG".into(),
        domain: "MCA".into(),
        year_of_passing_out: "2026".into(),
        location: "Thoothukudi (Tuticorin)".into(),
    }
}

#[test]
fn valid_input_echoes_every_field() {
    let record = validate(valid_input()).expect("valid");

    assert_eq!(record.first_name(), "Leo");
    assert_eq!(record.last_name(), "Das");
    assert_eq!(record.email(), "leodas@gmail.com");
    assert_eq!(record.contact(), "9876543210");
    assert_eq!(record.college(), "Anna University CEG Campus");
    assert_eq!(record.degree(), Degree::Pg);
    assert_eq!(record.domain(), Domain::Mca);
    assert_eq!(record.year_of_passing_out(), YearOfPassingOut::Y2026);
    assert_eq!(record.location(), District::Thoothukudi);
}

#[test]
fn row_follows_column_order() {
    let record = validate(valid_input()).expect("valid");
    assert_eq!(
        record.to_row(),
        [
            "Leo",
            "Das",
            "leodas@gmail.com",
            "9876543210",
            "Anna University CEG Campus",
            "PG",
            "MCA",
            "2026",
            "Thoothukudi (Tuticorin)",
        ]
        .map(String::from)
    );
}

#[test]
fn short_first_name_is_rejected() {
    for name in ["", "L"] {
        let mut input = valid_input();
        input.first_name = name.into();

        let errors = validate(input).expect_err("should fail");
        assert_eq!(errors.get(Field::FirstName), Some(NAME_TOO_SHORT));
        assert_eq!(errors.len(), 1);
    }
}

#[test]
fn email_without_domain_is_rejected() {
    for email in [
        "leodas",
        "leodas@",
        "@gmail.com",
        "",
        "leo@gmail",
        "a@b",
        "leo@localhost",
        "leo..das@gmail.com",
        ".leo@gmail.com",
        "leo@[127.0.0.1]",
        "leo@1.2",
    ] {
        let mut input = valid_input();
        input.email = email.into();

        let errors = validate(input).expect_err("should fail");
        assert_eq!(errors.get(Field::Email), Some(INVALID_EMAIL), "email {email:?}");
    }
}

#[test]
fn common_email_shapes_are_accepted() {
    for email in ["leodas@gmail.com", "leo.das+mm@mail.annauniv.edu.in", "LEO_DAS@Example.IN"] {
        let mut input = valid_input();
        input.email = email.into();

        assert!(validate(input).is_ok(), "email {email:?}");
    }
}

#[test]
fn unknown_option_reports_one_message() {
    let mut input = valid_input();
    input.location = "Bengaluru".into();

    let errors = validate(input).expect_err("should fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(Field::Location), Some("Select a valid location"));
}

#[test]
fn contact_length_must_be_exactly_ten() {
    for contact in ["987654321", "98765432101"] {
        let mut input = valid_input();
        input.contact = contact.into();

        let errors = validate(input).expect_err("should fail");
        assert_eq!(errors.get(Field::Contact), Some(INVALID_CONTACT));
    }
}

#[test]
fn contact_digits_are_not_enforced() {
    let mut input = valid_input();
    input.contact = "abcdefghij".into();

    let record = validate(input).expect("length is the only contact rule");
    assert_eq!(record.contact(), "abcdefghij");
}

#[test]
fn college_may_be_empty() {
    let mut input = valid_input();
    input.college.clear();

    assert!(validate(input).is_ok());
}

#[test]
fn every_failing_field_is_reported() {
    let input = RawFormInput {
        first_name: "L".into(),
        last_name: "D".into(),
        email: "nope".into(),
        contact: "123".into(),
        college: String::new(),
        degree: "PhD".into(),
        domain: "Arts".into(),
        year_of_passing_out: "2030".into(),
        location: "Bengaluru".into(),
    };

    let errors = validate(input).expect_err("should fail");
    let failed: Vec<Field> = errors.iter().map(|(field, _)| field).collect();
    assert_eq!(
        failed,
        vec![
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Contact,
            Field::Degree,
            Field::Domain,
            Field::YearOfPassingOut,
            Field::Location,
        ]
    );
    assert_eq!(errors.get(Field::Degree), Some("Select a valid degree"));
}

#[test]
fn enumerated_values_are_case_sensitive() {
    let mut input = valid_input();
    input.domain = "btech".into();

    let errors = validate(input).expect_err("should fail");
    assert!(errors.contains(Field::Domain));
}

#[test]
fn initial_form_selects_first_options_and_fails_on_text_fields() {
    let initial = RawFormInput::initial();
    assert_eq!(initial.value(Field::Degree), "UG");
    assert_eq!(initial.value(Field::Domain), "BE");
    assert_eq!(initial.value(Field::YearOfPassingOut), "2024");
    assert_eq!(initial.value(Field::Location), "Ariyalur");

    let errors = validate(initial).expect_err("blank text fields");
    assert!(errors.contains(Field::FirstName));
    assert!(errors.contains(Field::Email));
    assert!(!errors.contains(Field::Degree));
    assert!(!errors.contains(Field::College));
}

#[test]
fn field_names_round_trip() {
    for field in Field::ALL {
        assert_eq!(Field::from_name(field.name()), Some(field));
    }
    assert_eq!(Field::from_name("firstName"), None);
}

#[test]
fn option_lists_match_the_form() {
    assert_eq!(Degree::ALL.len(), 2);
    assert_eq!(Domain::ALL.len(), 8);
    assert_eq!(YearOfPassingOut::ALL.len(), 4);
    assert_eq!(District::ALL.len(), 32);
    assert_eq!(District::ALL.last().map(|d| d.as_str()), Some("Virudhunagar"));
    assert_eq!("BTech".parse::<Domain>(), Ok(Domain::BTech));
}
