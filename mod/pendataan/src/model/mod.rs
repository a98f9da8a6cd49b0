mod id;
mod instansi;
mod kebijakan;
mod pengguna;

pub use id::{id_str, id_str_opt};
pub use instansi::{CreateInstansi, Instansi, UpdateInstansi};
pub use kebijakan::{
    CreateKebijakan, Kebijakan, KebijakanDetail, KebijakanProses, KebijakanRow, UpdateKebijakan,
};
pub use pengguna::{
    CreateAdmin, CreateEnumerator, Enumerator, InstansiEnumerator, Pengguna, UpdateEnumerator,
    PERAN_ADMIN_INSTANSI, PERAN_ENUMERATOR, PERAN_SUPERADMIN,
};
