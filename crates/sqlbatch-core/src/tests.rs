//! Tests for core value and dialect types

use super::*;

mod value_tests {
    use super::*;

    #[test]
    fn test_value_from_scalars() {
        assert_eq!(Value::from(7i32), Value::Int32(7));
        assert_eq!(Value::from(7i64), Value::Int64(7));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("roobs"), Value::String("roobs".to_string()));
        assert_eq!(Value::from(1.5f64), Value::Float64(1.5));
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("dev")), Value::String("dev".to_string()));
        assert!(Value::from(None::<&str>).is_null());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int32(3).as_i64(), Some(3));
        assert_eq!(Value::String("42".into()).as_i64(), Some(42));
        assert_eq!(Value::String("boss".into()).as_str(), Some("boss"));
        assert_eq!(Value::Null.as_str(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_row_lookup_by_name() {
        let row = Row::new(
            vec!["id".into(), "name".into()],
            vec![Value::Int64(1), Value::from("roobs")],
        );

        assert_eq!(row.get_by_name("name"), Some(&Value::from("roobs")));
        assert_eq!(row.get(0), Some(&Value::Int64(1)));
        assert!(row.get_by_name("missing").is_none());
        assert_eq!(row.to_map().len(), 2);
    }
}

mod dialect_tests {
    use super::*;

    #[test]
    fn test_dialect_max_parameters() {
        assert_eq!(Dialect::Sqlite.max_parameters(), 999);
        assert_eq!(Dialect::Mysql.max_parameters(), 65_535);
        assert_eq!(Dialect::Postgres.max_parameters(), 65_535);
        assert_eq!(Dialect::Mssql.max_parameters(), 2_100);
        assert_eq!(Dialect::Generic.max_parameters(), DEFAULT_MAX_PARAMETERS);
    }

    #[test]
    fn test_dialect_from_id() {
        assert_eq!(Dialect::from_id("PostgreSQL"), Some(Dialect::Postgres));
        assert_eq!(Dialect::from_id("mariadb"), Some(Dialect::Mysql));
        assert_eq!(Dialect::from_id("oracle"), None);
        assert_eq!(Dialect::default(), Dialect::Generic);
    }

    #[test]
    fn test_connection_config_params() {
        let config = ConnectionConfig::new_sqlite(":memory:").with_param("mode", "rwc");

        assert_eq!(config.get_string("path").as_deref(), Some(":memory:"));
        assert_eq!(config.get_string("mode").as_deref(), Some("rwc"));
        assert!(config.get_string("host").is_none());
    }
}
