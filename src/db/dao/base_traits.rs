use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasIdColumn: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
}

pub trait SoftDeletableEntity: sea_orm::EntityTrait {
    fn deleted_at_column() -> Self::Column;
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}

pub trait SoftDeleteActiveModel {
    fn set_deleted_at(&mut self, ts: Option<DateTimeWithTimeZone>);
}
