use banco_core::service::report_service::{REPORT_ACCOUNT_TYPES, REPORT_CUSTOMER_NAMES};
use banco_core::{
    banking_schema, open_db_in_memory, seed, seed_sample_data, AccountDraft, AccountRepository,
    BalanceRow, CustomerDraft, CustomerRepository, ReportService, SqliteAccountRepository,
    SqliteCustomerRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn seeded_connection() -> Connection {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();
    seed_sample_data(&mut conn).unwrap();
    conn
}

fn balance_set(rows: &[BalanceRow]) -> HashSet<(String, u64, String)> {
    rows.iter()
        .map(|row| {
            (
                row.customer_name.clone(),
                row.balance.to_bits(),
                row.kind.clone(),
            )
        })
        .collect()
}

#[test]
fn sample_customers_are_found_by_name() {
    let conn = seeded_connection();
    let repo = SqliteCustomerRepository::new(&conn);

    let customers = repo.find_by_names(&REPORT_CUSTOMER_NAMES).unwrap();
    let names: HashSet<_> = customers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, HashSet::from(["Rafael Ribeiro", "Carlos Roberto"]));
}

#[test]
fn exact_name_lookup_returns_one_matching_customer() {
    let conn = seeded_connection();
    let repo = SqliteCustomerRepository::new(&conn);

    let found = repo.find_by_names(&["Carlos Roberto"]).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Carlos Roberto");
    assert_eq!(found[0].cpf, "657435632");
    assert_eq!(found[0].address, "Pará de Minas/MG");
}

#[test]
fn sample_accounts_are_found_by_type() {
    let conn = seeded_connection();
    let repo = SqliteAccountRepository::new(&conn);

    let accounts = repo.find_by_types(&REPORT_ACCOUNT_TYPES).unwrap();
    assert_eq!(accounts.len(), 2);

    let numbers: HashSet<_> = accounts.iter().map(|a| a.number.as_str()).collect();
    assert_eq!(numbers, HashSet::from(["876564", "136564"]));
    assert!(accounts.iter().all(|account| account.customer_id.is_some()));
}

#[test]
fn join_returns_one_row_per_account_with_exact_balances() {
    let conn = seeded_connection();
    let repo = SqliteAccountRepository::new(&conn);

    let rows = repo.balance_rows().unwrap();
    assert_eq!(rows.len(), 2);

    let expected = balance_set(&[
        BalanceRow {
            customer_name: "Rafael Ribeiro".to_string(),
            balance: 1000.23,
            kind: "Conta Corrente".to_string(),
        },
        BalanceRow {
            customer_name: "Carlos Roberto".to_string(),
            balance: 2467.23,
            kind: "Conta Poupança".to_string(),
        },
    ]);
    assert_eq!(balance_set(&rows), expected);
}

#[test]
fn unknown_names_and_types_return_empty_results() {
    let conn = seeded_connection();
    let customers = SqliteCustomerRepository::new(&conn);
    let accounts = SqliteAccountRepository::new(&conn);

    assert!(customers.find_by_names(&["Ninguém"]).unwrap().is_empty());
    assert!(customers.find_by_names(&[]).unwrap().is_empty());
    assert!(accounts.find_by_types(&["Conta Salário"]).unwrap().is_empty());
    assert!(accounts.find_by_types(&[]).unwrap().is_empty());
}

#[test]
fn join_row_count_matches_accounts_per_customer() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();
    let drafts = vec![
        CustomerDraft::new("Ana Souza", "111222333", "Contagem/MG")
            .with_account(AccountDraft::new("Conta Corrente", "0001", "1", 10.5))
            .with_account(AccountDraft::new("Conta Poupança", "0001", "2", 20.25))
            .with_account(AccountDraft::new("Conta Salário", "0002", "3", 0.1)),
        CustomerDraft::new("Bruno Lima", "444555666", "Betim/MG")
            .with_account(AccountDraft::new("Conta Corrente", "0003", "4", 99.99)),
        CustomerDraft::new("Clara Dias", "777888999", "Sete Lagoas/MG"),
    ];
    seed(&mut conn, drafts).unwrap();

    let rows = SqliteAccountRepository::new(&conn).balance_rows().unwrap();
    let count_for = |name: &str| rows.iter().filter(|row| row.customer_name == name).count();
    assert_eq!(count_for("Ana Souza"), 3);
    assert_eq!(count_for("Bruno Lima"), 1);
    assert_eq!(count_for("Clara Dias"), 0);

    let clara = SqliteCustomerRepository::new(&conn)
        .find_by_names(&["Clara Dias"])
        .unwrap();
    assert_eq!(clara.len(), 1);
    assert_eq!(clara[0].cpf, "777888999");
}

#[test]
fn navigation_follows_foreign_key_both_ways() {
    let conn = seeded_connection();
    let customers = SqliteCustomerRepository::new(&conn);
    let accounts = SqliteAccountRepository::new(&conn);

    let rafael = customers
        .find_by_names(&["Rafael Ribeiro"])
        .unwrap()
        .remove(0);
    let owned = customers.accounts_of(rafael.id).unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].kind, "Conta Corrente");

    let owner = accounts.owner_of(&owned[0]).unwrap().unwrap();
    assert_eq!(owner, rafael);

    let reloaded = accounts.get_account(owned[0].id).unwrap().unwrap();
    assert_eq!(reloaded, owned[0]);
    assert!(customers.get_customer(rafael.id + 100).unwrap().is_none());
}

#[test]
fn account_number_text_is_stored_with_integer_affinity() {
    let conn = seeded_connection();

    let storage: String = conn
        .query_row(
            "SELECT typeof(num) FROM \"Conta\" WHERE tipo = 'Conta Corrente';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(storage, "integer");
}

#[test]
fn long_cpf_is_stored_despite_declared_width() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();
    seed(
        &mut conn,
        [CustomerDraft::new("Diego Alves", "123.456.789-09", "Ouro Preto/MG")],
    )
    .unwrap();

    let found = SqliteCustomerRepository::new(&conn)
        .find_by_names(&["Diego Alves"])
        .unwrap();
    assert_eq!(found[0].cpf, "123.456.789-09");
}

#[test]
fn report_renders_three_blocks_in_order() {
    let conn = seeded_connection();
    let report = ReportService::new(
        SqliteCustomerRepository::new(&conn),
        SqliteAccountRepository::new(&conn),
    )
    .run()
    .unwrap();

    assert_eq!(report.customers.len(), 2);
    assert_eq!(report.accounts.len(), 2);
    assert_eq!(report.balances.len(), 2);

    let mut out = Vec::new();
    report.write_to(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[..2].iter().all(|line| line.starts_with("Cliente('")));
    assert!(lines[2..4].iter().all(|line| line.starts_with("Conta('")));
    assert!(lines[4..].iter().all(|line| line.starts_with("Nome: ")));
    assert!(lines.contains(&"Cliente('Rafael Ribeiro', '657438674', 'Belo Horizonte/MG')"));
    assert!(lines.contains(&"Nome: Carlos Roberto, Saldo: 2467.23, Tipo de Conta Conta Poupança"));
}

#[test]
fn report_serializes_to_json() {
    let conn = seeded_connection();
    let report = ReportService::new(
        SqliteCustomerRepository::new(&conn),
        SqliteAccountRepository::new(&conn),
    )
    .run_with(&["Rafael Ribeiro"], &[])
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["customers"][0]["name"], "Rafael Ribeiro");
    assert_eq!(json["accounts"].as_array().unwrap().len(), 0);
    assert_eq!(json["balances"].as_array().unwrap().len(), 2);
}
