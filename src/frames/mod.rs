pub mod daily_load;
pub mod observation_frame;
