use banco_core::{
    banking_schema, open_db_in_memory, sample_customers, AccountDraft, CustomerDraft, RepoError,
    Session,
};
use rusqlite::Connection;

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\";"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn commit_persists_parents_and_children_with_generated_ids() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();

    let persisted = {
        let mut session = Session::new(&mut conn);
        session.add_all(sample_customers());
        assert_eq!(session.pending().len(), 2);
        let persisted = session.commit().unwrap();
        assert!(session.pending().is_empty());
        persisted
    };

    assert_eq!(persisted.len(), 2);
    assert_ne!(persisted[0].customer.id, persisted[1].customer.id);
    for item in &persisted {
        assert_eq!(item.accounts.len(), 1);
        assert_eq!(item.accounts[0].customer_id, Some(item.customer.id));
    }
    assert_eq!(persisted[0].accounts[0].number, "876564");
    assert_eq!(persisted[1].accounts[0].balance, 2467.23);

    assert_eq!(row_count(&conn, "Cliente"), 2);
    assert_eq!(row_count(&conn, "Conta"), 2);
}

#[test]
fn failed_account_insert_rolls_back_whole_commit() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_savings BEFORE INSERT ON \"Conta\"
         WHEN NEW.tipo = 'Conta Poupança'
         BEGIN
            SELECT RAISE(ABORT, 'savings accounts rejected');
         END;",
    )
    .unwrap();

    {
        let mut session = Session::new(&mut conn);
        session.add_all(sample_customers());
        let err = session.commit().unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
        assert_eq!(session.pending().len(), 2);
    }

    assert_eq!(row_count(&conn, "Cliente"), 0);
    assert_eq!(row_count(&conn, "Conta"), 0);
}

#[test]
fn dropping_uncommitted_session_writes_nothing() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();

    {
        let mut session = Session::new(&mut conn);
        session.add(
            CustomerDraft::new("Rafael Ribeiro", "657438674", "Belo Horizonte/MG")
                .with_account(AccountDraft::new("Conta Corrente", "0001", "876564", 1000.23)),
        );
    }

    assert_eq!(row_count(&conn, "Cliente"), 0);
    assert_eq!(row_count(&conn, "Conta"), 0);
}

#[test]
fn empty_commit_is_a_no_op() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();
    let mut session = Session::new(&mut conn);

    assert!(session.commit().unwrap().is_empty());
}

#[test]
fn session_can_commit_more_than_once() {
    let mut conn = open_db_in_memory(&banking_schema().unwrap()).unwrap();

    {
        let mut session = Session::new(&mut conn);
        session.add(CustomerDraft::new("Ana Souza", "111222333", "Contagem/MG"));
        session.commit().unwrap();
        session.add(CustomerDraft::new("Bruno Lima", "444555666", "Betim/MG"));
        let second = session.commit().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].customer.name, "Bruno Lima");
    }

    assert_eq!(row_count(&conn, "Cliente"), 2);
}
