pub mod executor;

pub use executor::{plan_stubs, stub_html, RouteStub, RouteStubExecutor};
