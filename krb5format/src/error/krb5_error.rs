use super::{error, Error};

impl Error {
    error!(KRB5_KT_UNKNOWN_TYPE, -1765328204, "Unknown Key table type");
    error!(KRB5_KT_NOWRITE, -1765328201, "Cannot write to specified key table");
    error!(KRB5_KT_IOERR, -1765328200, "Error writing to key table");
    error!(
        KRB5_KEYTAB_BADVNO,
        -1765328171, "Unsupported key table format version number"
    );
    error!(KRB5_KT_FORMAT, -1765328148, "Bad format in keytab");

    error!(
        KRB5_CC_UNKNOWN_TYPE,
        -1765328244, "Unknown credential cache type"
    );
    error!(
        KRB5_CCACHE_BADVNO,
        -1765328188, "Credentials cache file format version number not supported"
    );
    error!(KRB5_CC_FORMAT, -1765328185, "Bad format in credentials cache");

    error!(
        KRB5_DATA_TRUNCATED,
        -1765328147, "Data ended inside a fixed-width field"
    );
}
