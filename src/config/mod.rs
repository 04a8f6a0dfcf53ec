pub mod net_config;
