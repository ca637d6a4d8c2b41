//! Field-for-field conversion between [`EmployeeRecord`] and [`EmployeeDto`].
//! No validation happens here.

use crate::{dto::EmployeeDto, model::EmployeeRecord};

pub fn to_record(dto: EmployeeDto) -> EmployeeRecord {
    EmployeeRecord {
        id: dto.id,
        full_name: dto.full_name,
        email: dto.email,
    }
}

pub fn to_dto(record: EmployeeRecord) -> EmployeeDto {
    EmployeeDto {
        id: record.id,
        full_name: record.full_name,
        email: record.email,
    }
}

impl From<EmployeeRecord> for EmployeeDto {
    fn from(record: EmployeeRecord) -> Self {
        to_dto(record)
    }
}

impl From<EmployeeDto> for EmployeeRecord {
    fn from(dto: EmployeeDto) -> Self {
        to_record(dto)
    }
}
