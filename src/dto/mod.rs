pub mod login_dto;
pub mod registration_dto;
pub mod vacancy_dto;
