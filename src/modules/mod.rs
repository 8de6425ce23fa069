pub mod academic_years;
pub mod homeroom;
