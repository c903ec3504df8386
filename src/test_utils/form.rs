use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, attribute: &str, endpoint: &str) {
    let hx_attribute = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_attribute, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_attribute:?}"
    );
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    for input in form.select(&Selector::parse("input").unwrap()) {
        let input_name = input.value().attr("name").unwrap_or_default();
        let input_type = input.value().attr("type").unwrap_or_default();

        if input_name == name && input_type == type_ {
            return;
        }
    }

    panic!("No input found with name \"{name}\" and type \"{type_}\"");
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    let submit_button = form
        .select(&Selector::parse("button").unwrap())
        .next()
        .expect("No button found");

    assert_eq!(
        submit_button.value().attr("type").unwrap_or_default(),
        "submit",
        "want submit button with type=\"submit\""
    );
}
