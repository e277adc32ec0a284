#[cfg(test)]
pub mod test {
    use std::marker::PhantomData;

    use crate::record::{Field, Record};

    #[derive(Debug, Clone, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: i64,
        pub token: String,
        pub workers: i64,
        /// Never bound.
        pub build_id: String,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: "localhost".into(),
                port: 8080,
                token: String::new(),
                workers: 4,
                build_id: "dev".into(),
            }
        }
    }

    crate::record!(ServerConfig {
        host => { flag: "host", env: "HOST", usage: "address to bind" },
        port => { flag: "port", env: "PORT", usage: "port to listen on" },
        token => { env: "TOKEN" },
        workers => { flag: "workers", usage: "worker threads" },
    });

    /// Record whose flag and environment names differ.
    #[derive(Debug, Default)]
    pub struct Split {
        pub x: i64,
    }

    crate::record!(Split {
        x => { flag: "x", env: "X", usage: "the x value" },
    });

    /// Record registering the same variable twice.
    #[derive(Debug, Default)]
    pub struct Clashing {
        pub a: String,
        pub b: String,
    }

    crate::record!(Clashing {
        a => { env: "SAME" },
        b => { env: "SAME" },
    });

    /// Record declaring one flag twice.
    #[derive(Debug, Default)]
    pub struct Twice {
        pub a: i64,
        pub b: i64,
    }

    crate::record!(Twice {
        a => { flag: "dup" },
        b => { flag: "dup" },
    });

    /// Record claiming clap's own help flag.
    #[derive(Debug, Default)]
    pub struct Reserved {
        pub help: String,
    }

    crate::record!(Reserved {
        help => { flag: "help" },
    });

    #[derive(Debug, Default)]
    pub struct Generic<T> {
        pub name: String,
        _marker: PhantomData<T>,
    }

    impl<T> Record for Generic<T> {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::new(&mut self.name).flag("name").env("NAME")]
        }
    }

    #[test]
    fn server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 4);
        assert!(config.token.is_empty());
    }
}
