#[cfg(test)]
mod tests {
    use taskboard::db::clients::Clients;
    use taskboard::db::users::Users;
    use taskboard::libs::reference::{initials, Client, Role, User};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ReferenceTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ReferenceTestContext {
        fn setup() -> Self {
            ReferenceTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl ReferenceTestContext {
        fn db_path(&self) -> std::path::PathBuf {
            self.temp_dir.path().join("taskboard.db")
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ana Maria Lopez"), "AM");
        assert_eq!(initials("  bob  "), "B");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Data Scientist".parse::<Role>().unwrap(), Role::DataScientist);
        assert_eq!("data-engineer".parse::<Role>().unwrap(), Role::DataEngineer);
        assert_eq!("MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert!("intern".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Analyst);
    }

    #[test]
    fn test_new_user_normalizes_fields() {
        let user = User::new(" Ana Lopez ", " Ana@Example.COM ", Role::Manager);
        assert_eq!(user.name, "Ana Lopez");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.avatar, "AL");
        assert!(user.id.starts_with('u'));
    }

    #[test_context(ReferenceTestContext)]
    #[test]
    fn test_client_crud(ctx: &mut ReferenceTestContext) {
        let clients = Clients::open(ctx.db_path()).unwrap();
        let acme = Client::new("Acme");
        let globex = Client::new("Globex");
        clients.insert(&globex).unwrap();
        clients.insert(&acme).unwrap();

        let names: Vec<String> = clients.fetch().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
        assert_eq!(clients.get(&acme.id).unwrap().map(|c| c.name), Some("Acme".to_string()));

        assert_eq!(clients.delete(&acme.id).unwrap(), 1);
        assert_eq!(clients.delete(&acme.id).unwrap(), 0);
        assert!(clients.get(&acme.id).unwrap().is_none());
    }

    #[test_context(ReferenceTestContext)]
    #[test]
    fn test_user_crud_and_unique_email(ctx: &mut ReferenceTestContext) {
        let users = Users::open(ctx.db_path()).unwrap();
        let ana = User::new("Ana Lopez", "ana@example.com", Role::DataScientist);
        users.insert(&ana).unwrap();

        let duplicate = User::new("Ana Again", "ANA@example.com", Role::Analyst);
        assert!(users.insert(&duplicate).is_err());

        let stored = users.get(&ana.id).unwrap().unwrap();
        assert_eq!(stored.role, Role::DataScientist);
        assert_eq!(stored.avatar, "AL");
        assert_eq!(users.fetch().unwrap().len(), 1);

        assert_eq!(users.delete(&ana.id).unwrap(), 1);
        assert!(users.fetch().unwrap().is_empty());
    }
}
