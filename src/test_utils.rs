use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use figment::{providers::Serialized, Figment};
use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};
use validator::extras::{cnpj_check_digits, cpf_check_digits};

use crate::{
    config, http,
    schema::{NewUser, User},
    types::{
        form::users::register,
        id::{marker::UserMarker, Id},
        PersonType, Role,
    },
    App,
};

pub const PASSWORD: &str = "abcdefg1";
pub const CNPJ_CARD: &str = "data:application/pdf;base64,JVBERi0xLjQK";

/// Default configuration with a private in-memory database.
pub fn config() -> config::Server {
    let figment = Figment::new().merge(Serialized::default("db.url", "sqlite::memory:"));
    config::Server::from_figment(&figment).expect("test configuration should be valid")
}

/// Default configuration backed by a database file inside `dir`.
pub fn file_config(dir: &Path) -> config::Server {
    let mut config = config();
    config.db.url = format!("sqlite://{}", dir.join("obraconecta.db").display()).into();
    config
}

/// Everything [`http::run`] mounts except the middleware.
pub fn http_app(
    app: App,
) -> actix_web::App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .configure(http::configure(app))
        .default_service(web::to(http::util::not_found))
}

fn next() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

fn digits<const N: usize>(value: u64) -> [u8; N] {
    let text = format!("{value:0width$}", width = N);
    let mut digits = [0u8; N];
    for (digit, byte) in digits.iter_mut().zip(text.bytes()) {
        *digit = byte - b'0';
    }
    digits
}

fn join(base: &[u8], check: [u8; 2]) -> String {
    base.iter()
        .chain(check.iter())
        .map(|d| char::from(b'0' + d))
        .collect()
}

/// A valid CPF nobody else in this test run got.
pub fn unique_cpf() -> String {
    let base = digits::<9>(123_456_000 + next());
    join(&base, cpf_check_digits(base))
}

/// A valid CNPJ (head office) nobody else in this test run got.
pub fn unique_cnpj() -> String {
    let base = digits::<12>((11_222_000 + next()) * 10_000 + 1);
    join(&base, cnpj_check_digits(base))
}

pub fn unique_email() -> String {
    format!("user{}@example.com", next())
}

/// Complete signup of a client.
pub fn client_form() -> register::Request {
    register::Request {
        role: Some(Role::Client),
        person_type: Some(PersonType::Cpf),
        name: Some("Maria da Silva".into()),
        birth_date: Some("1990-05-17".into()),
        cpf: Some(unique_cpf().into()),
        rg: Some("12.345.678-9".into()),
        phone: Some("(11) 98765-4321".into()),
        email: Some(unique_email()),
        password: Some(PASSWORD.into()),
        ..Default::default()
    }
}

/// Complete signup of an individual professional.
pub fn professional_form() -> register::Request {
    register::Request {
        role: Some(Role::Professional),
        name: Some("João Pereira".into()),
        services: Some(vec!["Reformas".into(), "Marcenaria".into()]),
        ..client_form()
    }
}

/// Complete signup of a company, trading as "Obra Boa".
pub fn company_form() -> register::Request {
    register::Request {
        role: Some(Role::Professional),
        person_type: Some(PersonType::Cnpj),
        birth_date: Some("2015-03-02".into()),
        phone: Some("(11) 3456-7890".into()),
        email: Some(unique_email()),
        password: Some(PASSWORD.into()),
        cnpj: Some(unique_cnpj()),
        company_name: Some("Obra Boa Construções Ltda".into()),
        trade_name: Some("Obra Boa".into()),
        contact_name: Some("Maria da Silva".into()),
        contact_email: Some("maria@obraboa.com.br".into()),
        contact_phone: Some("(11) 98765-4321".into()),
        contact_cpf: Some(unique_cpf().into()),
        contact_rg: Some("12.345.678-9".into()),
        contact_birth_date: Some("1985-11-30".into()),
        cnpj_card: Some(CNPJ_CARD.into()),
        services: Some(vec!["Construção Civil".into(), "Reformas".into()]),
        ..Default::default()
    }
}

/// What [`NewUser::insert`] would return, without a database.
pub fn stored(user: NewUser, password_hash: &str) -> User {
    let now = chrono::Utc::now().naive_utc();
    User {
        id: Id::<UserMarker>::new(1),
        role: user.role,
        person_type: user.person_type,
        name: user.name,
        birth_date: user.birth_date,
        cpf: user.cpf,
        rg: user.rg,
        cnpj: user.cnpj,
        company_name: user.company_name,
        trade_name: user.trade_name,
        contact_name: user.contact_name,
        contact_email: user.contact_email,
        contact_phone: user.contact_phone,
        contact_cpf: user.contact_cpf,
        contact_rg: user.contact_rg,
        contact_birth_date: user.contact_birth_date,
        cnpj_card: user.cnpj_card,
        email: user.email,
        phone: user.phone,
        services: user.services,
        password_hash: password_hash.to_string(),
        created_at: now,
        updated_at: now,
    }
}
