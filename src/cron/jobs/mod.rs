pub mod refresh_all;
