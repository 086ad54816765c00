// Tests for anchor section injection

use sitekeeper_core::anchors::{
    AnchorPlan, AnchorSection, Container, FixStatus, Injection, apply_plans, inject_sections,
};
use sitekeeper_scanner::collect_ids;
use std::fs;
use tempfile::TempDir;

fn section(id: &str, heading: &str, body: Option<&str>) -> AnchorSection {
    AnchorSection {
        id: id.to_string(),
        heading: heading.to_string(),
        body: body.map(|b| b.to_string()),
    }
}

fn services_plan(file: &str) -> AnchorPlan {
    AnchorPlan::new(
        file,
        vec![
            section("services", "Our Services", Some("What we offer.")),
            section("contact", "Contact", None),
        ],
    )
}

const MAIN_PAGE: &str = r#"<html><body>
    <nav><a href="index.html">Home</a></nav>
    <main>
        <h1>Welcome</h1>
    </main>
    <footer>Footer</footer>
</body></html>"#;

const ARTICLE_PAGE: &str = r#"<html><body>
    <main>
        <article>
            <h1>Report</h1>
        </article>
        <aside>Related</aside>
    </main>
</body></html>"#;

// ============================================================================
// Injection Tests
// ============================================================================

#[test]
fn test_inject_before_closing_main() {
    let plan = services_plan("index.html");

    let Injection::Inserted { content, ids } = inject_sections(MAIN_PAGE, &plan).unwrap() else {
        panic!("expected sections to be inserted");
    };

    assert_eq!(ids, vec!["services", "contact"]);

    let sections_at = content.find(r#"<section id="services""#).unwrap();
    let main_closes_at = content.find("</main>").unwrap();
    assert!(sections_at < main_closes_at);
    assert!(content.contains("<!-- Anchor sections for navigation -->"));
    assert!(content.contains("<h2>Our Services</h2>"));
    assert!(content.contains(
        r#"<p style="color: var(--text-grey); font-size: 1.1rem;">What we offer.</p>"#
    ));

    let page_ids = collect_ids(&content).unwrap();
    assert!(page_ids.contains("services"));
    assert!(page_ids.contains("contact"));
}

#[test]
fn test_auto_container_prefers_article() {
    let plan = services_plan("report.html");

    let Injection::Inserted { content, .. } = inject_sections(ARTICLE_PAGE, &plan).unwrap() else {
        panic!("expected sections to be inserted");
    };

    let sections_at = content.find(r#"<section id="services""#).unwrap();
    let article_closes_at = content.find("</article>").unwrap();
    assert!(sections_at < article_closes_at);
}

#[test]
fn test_main_container_skips_article() {
    let mut plan = services_plan("report.html");
    plan.container = Container::Main;

    let Injection::Inserted { content, .. } = inject_sections(ARTICLE_PAGE, &plan).unwrap() else {
        panic!("expected sections to be inserted");
    };

    let sections_at = content.find(r#"<section id="services""#).unwrap();
    assert!(sections_at > content.find("</aside>").unwrap());
    assert!(sections_at < content.find("</main>").unwrap());
}

#[test]
fn test_existing_ids_are_not_duplicated() {
    let page = MAIN_PAGE.replace("<h1>Welcome</h1>", r#"<h1 id="services">Welcome</h1>"#);
    let plan = services_plan("index.html");

    let Injection::Inserted { content, ids } = inject_sections(&page, &plan).unwrap() else {
        panic!("expected sections to be inserted");
    };

    assert_eq!(ids, vec!["contact"]);
    assert_eq!(content.matches(r#"id="services""#).count(), 1);
}

#[test]
fn test_second_injection_is_already_present() {
    let plan = services_plan("index.html");
    let Injection::Inserted { content, .. } = inject_sections(MAIN_PAGE, &plan).unwrap() else {
        panic!("expected sections to be inserted");
    };

    assert_eq!(inject_sections(&content, &plan).unwrap(), Injection::AlreadyPresent);
}

#[test]
fn test_page_without_container() {
    let plan = services_plan("plain.html");
    let page = "<html><body><div>No landmarks</div></body></html>";

    assert_eq!(inject_sections(page, &plan).unwrap(), Injection::NoContainer);
}

#[test]
fn test_article_container_requires_article() {
    let mut plan = services_plan("index.html");
    plan.container = Container::Article;

    assert_eq!(inject_sections(MAIN_PAGE, &plan).unwrap(), Injection::NoContainer);
}

// ============================================================================
// Site Tests
// ============================================================================

#[test]
fn test_apply_plans_writes_and_reports() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), MAIN_PAGE).unwrap();

    let plans = vec![services_plan("index.html"), services_plan("legal/missing.html")];
    let outcomes = apply_plans(dir.path(), &plans, false).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes[0].status,
        FixStatus::Inserted(vec!["services".to_string(), "contact".to_string()])
    );
    assert_eq!(outcomes[1].file, "legal/missing.html");
    assert_eq!(outcomes[1].status, FixStatus::MissingFile);

    let written = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(written.contains(r#"<section id="contact""#));

    let again = apply_plans(dir.path(), &plans[..1], false).unwrap();
    assert_eq!(again[0].status, FixStatus::AlreadyPresent);
}

#[test]
fn test_apply_plans_dry_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), MAIN_PAGE).unwrap();

    let outcomes = apply_plans(dir.path(), &[services_plan("index.html")], true).unwrap();

    assert!(matches!(outcomes[0].status, FixStatus::Inserted(_)));
    assert_eq!(
        fs::read_to_string(dir.path().join("index.html")).unwrap(),
        MAIN_PAGE
    );
}

#[test]
fn test_plan_defaults_from_toml() {
    let plan: AnchorPlan = toml::from_str(
        r#"
        file = "about.html"
        container = "main"

        [[sections]]
        id = "terms"
        heading = "Terms"
        "#,
    )
    .unwrap();

    assert_eq!(plan.container, Container::Main);
    assert_eq!(plan.heading_tag, "h2");
    assert!(plan.heading_class.is_none());
    assert_eq!(plan.sections[0].body, None);
}
