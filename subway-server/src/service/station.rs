//! Station management.

use tracing::info;

use crate::domain::{Station, StationId};
use crate::store::Store;

use super::{ServiceError, SubwayService, required};

impl<S: Store> SubwayService<S> {
    /// Registers a station. Surrounding whitespace is dropped from the name.
    pub fn create_station(&self, name: &str) -> Result<Station, ServiceError> {
        let name = required(name, "station name")?;
        let station = self.store.insert_station(&name)?;
        info!(station = %station, "created station");
        Ok(station)
    }

    pub fn list_stations(&self) -> Result<Vec<Station>, ServiceError> {
        Ok(self.store.list_stations()?)
    }

    /// Deletes a station no line runs through.
    pub fn delete_station(&self, id: StationId) -> Result<(), ServiceError> {
        self.store.delete_station(id)?;
        info!(station = %id, "deleted station");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{network, service};
    use super::*;
    use crate::service::ErrorKind;
    use crate::store::StoreError;

    #[test]
    fn create_and_list() {
        let service = service();
        let gangnam = service.create_station(" Gangnam ").unwrap();
        service.create_station("Yeoksam").unwrap();

        assert_eq!(gangnam.name(), "Gangnam");
        let names: Vec<String> = service
            .list_stations()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Gangnam", "Yeoksam"]);
    }

    #[test]
    fn names_must_be_unique_and_present() {
        let service = service();
        service.create_station("Gangnam").unwrap();

        let err = service.create_station("Gangnam  ").unwrap_err();
        assert_eq!(
            err,
            ServiceError::Store(StoreError::DuplicateStationName("Gangnam".to_string()))
        );
        assert_eq!(err.kind(), ErrorKind::Invalid);

        assert!(matches!(
            service.create_station(""),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn station_on_a_line_cannot_be_deleted() {
        let service = network();
        let err = service.delete_station(StationId(4)).unwrap_err();
        assert_eq!(err, ServiceError::Store(StoreError::StationInUse(StationId(4))));

        let spare = service.create_station("Spare").unwrap();
        service.delete_station(spare.id()).unwrap();
        assert_eq!(
            service.delete_station(spare.id()).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
