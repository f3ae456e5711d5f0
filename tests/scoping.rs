//! Scope, capture, include and promotion behaviour.

mod common;

use common::{assert_render, init_logging, PartialReader};
use tardy::{Assigns, Context, Template};

#[test]
fn test_assign_and_reassign() {
    assert_render(
        "{% assign x = 1 %}{{ x }}{% assign x = x + 1 %}{{ x }}",
        Assigns::new(),
        "12",
    );
}

#[test]
fn test_loop_variables_stay_in_the_loop() {
    // The loop variable and forloop disappear with the loop; assigns made
    // inside the body escape it.
    assert_render(
        "{% for x in [1,2] %}{% assign seen = x %}{% end %}{{ x }}|{{ forloop.index }}|{{ seen }}",
        Assigns::new(),
        "||2",
    );
}

#[test]
fn test_loop_shadowing_restores_outer_bindings() {
    assert_render(
        "{% assign x = \"outer\" %}{% for x in [\"inner\"] %}{{ x }}{% end %}{{ x }}",
        Assigns::new(),
        "innerouter",
    );
}

#[test]
fn test_capture() {
    assert_render(
        "{% capture greeting %}Hello {{ \"world\" | upcase }}{% end %}{{ greeting }}!",
        Assigns::new(),
        "Hello WORLD!",
    );
}

#[test]
fn test_capture_does_not_echo_its_body() {
    assert_render(
        "a{% capture hidden %}invisible{% end %}b",
        Assigns::new(),
        "ab",
    );
}

fn render_with_partials(input: &str, partials: &[(&str, &str)]) -> (String, Vec<String>) {
    init_logging();

    let mut ctx = Context::new().with_reader(PartialReader::new(partials));
    let mut template = Template::new(input);
    let output = template.render(&mut ctx);

    (output, template.errors)
}

#[test]
fn test_include_renders_the_partial() {
    let (output, errors) = render_with_partials(
        "start {% include \"greeting\" %} end",
        &[("greeting", "Hello {{ \"x\" | upcase }}")],
    );

    assert!(errors.is_empty());
    assert_eq!("start Hello X end", output);
}

#[test]
fn test_include_sees_outer_variables() {
    init_logging();

    let mut ctx =
        Context::new().with_reader(PartialReader::new(&[("header", "<h1>{{ title }}</h1>")]));
    ctx.set("title", "Tardy");

    let mut template = Template::new("{% include \"header\" %}");
    assert_eq!("<h1>Tardy</h1>", template.render(&mut ctx));
}

#[test]
fn test_include_assigns_stay_local_without_promote() {
    let (output, errors) = render_with_partials(
        "{% include \"partial\" %}{{ local }}",
        &[("partial", "{% assign local = \"secret\" %}")],
    );

    assert!(errors.is_empty());
    assert_eq!("", output);
}

#[test]
fn test_promote_escapes_an_include() {
    let (output, errors) = render_with_partials(
        "{% include \"partial\" %}{{ from_partial }}",
        &[(
            "partial",
            "{% assign from_partial = 'Hi' %}{% promote from_partial %}",
        )],
    );

    assert!(errors.is_empty());
    assert_eq!("Hi", output);
}

#[test]
fn test_promote_escapes_nested_includes() {
    let (output, errors) = render_with_partials(
        "{% include \"outer\" %}{{ deep }}",
        &[
            ("outer", "{% include \"inner\" %}"),
            ("inner", "{% assign deep = \"Hi\" %}{% promote deep %}"),
        ],
    );

    assert!(errors.is_empty());
    assert_eq!("Hi", output);
}

#[test]
fn test_missing_reader_renders_the_diagnostic() {
    assert_render(
        "{% include \"somewhere\" %}",
        Assigns::new(),
        "ERROR: Reader not implemented. Cannot read content at somewhere",
    );
}

#[test]
fn test_include_with_a_bare_identifier_uses_the_name_itself() {
    // Identifier arguments reach tags as their verbatim name, so
    // `{% include header %}` loads the partial literally called "header".
    let (output, errors) =
        render_with_partials("{% include header %}", &[("header", "the header")]);

    assert!(errors.is_empty());
    assert_eq!("the header", output);
}

#[test]
fn test_include_with_a_computed_name() {
    let (output, errors) = render_with_partials(
        "{% assign which = \"a\" %}{% include (which | upcase) %}",
        &[("A", "chose A")],
    );

    assert!(errors.is_empty());
    assert_eq!("chose A", output);
}
