pub mod public_dashboard;
