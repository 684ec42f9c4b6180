use horrorshow::{helper::doctype, html, Raw, RenderOnce, Template, TemplateBuffer};
use shared::{
    domain::{Degree, District, Domain, YearOfPassingOut},
    Field, FieldErrors, RawFormInput,
};
use tracing::error;

pub const BRAND: &str = "Clover Technologies";
pub const EVENT_TITLE: &str = "Mega Mentorship 2024";
pub const DESCRIPTION: &str = "Conducted by clover technologies";
pub const TAGLINE: &str = "Having doubts what to do next? Just grab a coffee with us!";
pub const RETRY_NOTICE: &str =
    "We could not save your registration right now. Please check your details and try again.";

const STYLE: &str = r#"
	body {
		font-family: system-ui, sans-serif;
		margin: 0;
		background: #f4f7f2;
		color: #1d2a1b;
	}
	header {
		padding: 16px 24px;
		background: #1f6f3f;
	}
	.brand {
		margin: 0;
		color: #ffffff;
		font-size: 22px;
	}
	main {
		max-width: 640px;
		margin: 24px auto;
		padding: 0 16px;
	}
	.tagline {
		color: #4b5a48;
	}
	.field {
		display: flex;
		flex-direction: column;
		margin-bottom: 14px;
	}
	.field input, .field select {
		font-size: 16px;
		padding: 8px;
	}
	.error {
		color: #c0392b;
		font-size: 14px;
	}
	.notice {
		padding: 10px 12px;
		border-radius: 6px;
		background: #fdecea;
		color: #8a1c12;
	}
	.cta {
		display: inline-block;
		padding: 10px 18px;
		border-radius: 6px;
		background: #25d366;
		color: #ffffff;
		text-decoration: none;
	}
"#;

fn choices(field: Field) -> Option<Vec<&'static str>> {
    let options = match field {
        Field::Degree => Degree::ALL.iter().map(|v| v.as_str()).collect(),
        Field::Domain => Domain::ALL.iter().map(|v| v.as_str()).collect(),
        Field::YearOfPassingOut => YearOfPassingOut::ALL.iter().map(|v| v.as_str()).collect(),
        Field::Location => District::ALL.iter().map(|v| v.as_str()).collect(),
        _ => return None,
    };
    Some(options)
}

fn placeholder(field: Field) -> Option<&'static str> {
    match field {
        Field::FirstName => Some("Leo"),
        Field::LastName => Some("Das"),
        Field::Email => Some("leodas@gmail.com"),
        Field::Contact => Some("+91"),
        Field::College => Some("Anna University CEG Campus"),
        _ => None,
    }
}

fn input_type(field: Field) -> &'static str {
    match field {
        Field::Email => "email",
        Field::Contact => "tel",
        _ => "text",
    }
}

struct FormField<'a> {
    field: Field,
    value: &'a str,
    error: Option<&'a str>,
}

impl<'a> FormField<'a> {
    fn new(field: Field, input: &'a RawFormInput, errors: &'a FieldErrors) -> Self {
        Self {
            field,
            value: input.value(field),
            error: errors.get(field),
        }
    }
}

impl RenderOnce for FormField<'_> {
    fn render_once(self, tmpl: &mut TemplateBuffer) {
        let FormField { field, value, error } = self;
        tmpl << html! {
            div(class = "field") {
                label(for = field.name()) : field.label();
                @ if let Some(options) = choices(field) {
                    select(id = field.name(), name = field.name()) {
                        @ for choice in options {
                            @ if choice == value {
                                option(value = choice, selected = "selected") : choice;
                            } else {
                                option(value = choice) : choice;
                            }
                        }
                    }
                } else {
                    input(
                        id = field.name(),
                        name = field.name(),
                        type = input_type(field),
                        placeholder = placeholder(field).unwrap_or_default(),
                        value = value
                    );
                }
                @ if let Some(message) = error {
                    span(class = "error") : message;
                }
            }
        };
    }
}

struct Page<C> {
    content: C,
}

impl<C: RenderOnce> RenderOnce for Page<C> {
    fn render_once(self, tmpl: &mut TemplateBuffer) {
        let Page { content } = self;
        tmpl << html! {
            : doctype::HTML;
            html(lang = "en") {
                head {
                    meta(charset = "utf-8");
                    meta(name = "viewport", content = "width=device-width, initial-scale=1");
                    meta(name = "description", content = DESCRIPTION);
                    title : EVENT_TITLE;
                    style : Raw(STYLE);
                }
                body {
                    header {
                        h1(class = "brand") : BRAND;
                    }
                    main : content;
                }
            }
        };
    }
}

/// The registration form, with `input` echoed back and one message per failing field.
pub fn form_page(input: &RawFormInput, errors: &FieldErrors, retry_notice: bool) -> String {
    let content = html! {
        h2 : EVENT_TITLE;
        p(class = "tagline") : TAGLINE;
        @ if retry_notice {
            p(class = "notice", role = "alert") : RETRY_NOTICE;
        }
        form(action = "/register", method = "post") {
            @ for field in Field::ALL {
                : FormField::new(field, input, errors);
            }
            button(type = "submit") : "Submit";
        }
    };
    render(Page { content })
}

pub fn thank_you_page(invite_url: &str) -> String {
    let content = html! {
        h2 : "Thank you for registering!";
        p : "We will get back to you as soon as possible.";
        p : "Join our whatsapp community to receive any future updates regarding the event.";
        a(class = "cta", href = invite_url, target = "_blank", rel = "noopener noreferrer") : "Whatsapp";
    };
    render(Page { content })
}

fn render(page: impl RenderOnce) -> String {
    page.into_string().unwrap_or_else(|error| {
        error!(%error, "failed to render page");
        String::new()
    })
}
