// Login response data model and canonical encoding
pub mod response;

// Login request model and options selector
pub mod request;

// Authentication and response population
pub mod login;

// HTTP login endpoint
pub mod api;

// UDP circuit stand-in
pub mod udp;

// Login client
pub mod client;

// Configuration
pub mod config;
