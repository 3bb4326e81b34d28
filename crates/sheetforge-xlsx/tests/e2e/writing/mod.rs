mod basic;
mod loop_mode;
mod sheets;
