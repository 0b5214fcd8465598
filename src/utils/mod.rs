// Export utility modules
pub mod time;
