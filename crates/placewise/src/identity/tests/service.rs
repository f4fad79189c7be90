use axum::http::{header, HeaderMap, HeaderValue};

use crate::identity::domain::{Account, Role};
use crate::identity::service::{IdentityError, ProfileUpdate, RegisterRequest};
use crate::testutil::{unique_email, TestWorld};

fn registration(email: &str, role: Role) -> RegisterRequest {
    RegisterRequest {
        name: "Amira".to_string(),
        email: email.to_string(),
        password: "hunter22".to_string(),
        role,
        phone: Some("555-0100".to_string()),
    }
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    headers
}

fn login(world: &TestWorld, account: &Account) -> String {
    world
        .identity
        .authenticate(&account.email, "hunter22")
        .expect("authenticates")
        .1
}

#[test]
fn register_normalizes_email_and_rejects_any_case_duplicate() {
    let world = TestWorld::new();
    let account = world
        .identity
        .register(registration("Casing@Example.COM", Role::Student))
        .expect("registers");
    assert_eq!(account.email, "casing@example.com");
    assert!(account.is_active);
    assert!(!account.is_verified);

    assert!(matches!(
        world
            .identity
            .register(registration("cAsInG@eXaMpLe.com", Role::Recruiter)),
        Err(IdentityError::DuplicateEmail)
    ));
}

#[test]
fn register_validates_inputs() {
    let world = TestWorld::new();

    let mut nameless = registration(&unique_email("nameless"), Role::Student);
    nameless.name = "   ".to_string();
    assert!(matches!(
        world.identity.register(nameless),
        Err(IdentityError::Validation(_))
    ));

    assert!(matches!(
        world.identity.register(registration("not-an-email", Role::Student)),
        Err(IdentityError::Validation(_))
    ));

    let mut short = registration(&unique_email("short"), Role::Student);
    short.password = "12345".to_string();
    assert!(matches!(
        world.identity.register(short),
        Err(IdentityError::Validation(_))
    ));

    assert!(matches!(
        world
            .identity
            .register(registration(&unique_email("root"), Role::Admin)),
        Err(IdentityError::Validation(_))
    ));
}

#[test]
fn authenticate_rejects_bad_credentials_and_disabled_accounts() {
    let world = TestWorld::new();
    let account = world.student("Amira");

    assert!(matches!(
        world.identity.authenticate(&account.email, "wrong-pass"),
        Err(IdentityError::InvalidCredentials)
    ));
    assert!(matches!(
        world
            .identity
            .authenticate("nobody@example.com", "hunter22"),
        Err(IdentityError::InvalidCredentials)
    ));

    world.identity.toggle_active(&account.id).expect("disables");
    assert!(matches!(
        world.identity.authenticate(&account.email, "hunter22"),
        Err(IdentityError::InvalidCredentials)
    ));
}

#[test]
fn authorize_checks_token_role_and_liveness() {
    let world = TestWorld::new();
    let student = world.student("Amira");
    let token = login(&world, &student);

    let caller = world
        .identity
        .authorize(&bearer_headers(&token), &[Role::Student])
        .expect("authorizes");
    assert_eq!(caller.id, student.id);

    assert!(matches!(
        world.identity.authorize(&HeaderMap::new(), &[]),
        Err(IdentityError::MissingToken)
    ));
    assert!(matches!(
        world
            .identity
            .authorize(&bearer_headers("bogus.token.value"), &[]),
        Err(IdentityError::InvalidToken)
    ));
    assert!(matches!(
        world
            .identity
            .authorize(&bearer_headers(&token), &[Role::Recruiter, Role::Admin]),
        Err(IdentityError::Forbidden)
    ));

    // Deactivation revokes outstanding tokens immediately.
    world.identity.toggle_active(&student.id).expect("disables");
    assert!(matches!(
        world.identity.authorize(&bearer_headers(&token), &[]),
        Err(IdentityError::AccountDisabled)
    ));
}

#[test]
fn profile_updates_apply_only_to_students() {
    let world = TestWorld::new();
    let student = world.student("Amira");

    let updated = world
        .identity
        .update_profile(
            &student.id,
            ProfileUpdate {
                bio: Some("Distributed-systems enthusiast".to_string()),
                skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
                github: Some("https://github.com/amira".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("updates");
    let profile = updated.student_profile().expect("student profile");
    assert_eq!(profile.bio, "Distributed-systems enthusiast");
    assert_eq!(profile.skills.len(), 2);
    assert_eq!(profile.github.as_deref(), Some("https://github.com/amira"));

    let recruiter = world.recruiter("Rika");
    assert!(matches!(
        world
            .identity
            .update_profile(&recruiter.id, ProfileUpdate::default()),
        Err(IdentityError::NotAStudent)
    ));
}

#[test]
fn ensure_admin_is_idempotent() {
    let world = TestWorld::new();
    let seed = crate::config::AdminSeed {
        name: "Root".to_string(),
        email: unique_email("root"),
        password: "changeme1".to_string(),
    };
    let first = world.identity.ensure_admin(&seed).expect("provisions");
    let second = world.identity.ensure_admin(&seed).expect("idempotent");
    assert_eq!(first.id, second.id);
    assert_eq!(first.role(), Role::Admin);
}
