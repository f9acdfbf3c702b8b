pub mod config;
pub mod contract;
pub mod controller;
pub mod core_service;
pub mod document;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod query;
pub mod results_view;
pub mod runtime;
pub mod suggestions;
pub mod ticket;
pub mod transport;

#[cfg(test)]
mod tests {
    mod suggest_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/suggest_latency_test.rs"
        ));
    }
}
